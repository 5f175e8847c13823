use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use career_tree::application::dto::RecalculationPriority;
use career_tree::career_graph::domain::Bounds;
use career_tree::career_graph::services::SignatureStrategy;

/// Lay out, cull and recalculate career tree graphs
#[derive(Parser, Debug)]
#[command(name = "career-tree")]
#[command(version)]
#[command(about = "Lay out, cull and recalculate career tree graphs", long_about = None)]
pub struct Args {
    /// Path to a config file (defaults to ./career-tree.config.yml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the radial layout of a graph file
    Layout(LayoutArgs),
    /// List the nodes of a graph file that intersect a viewport
    Cull(CullArgs),
    /// Serve layout worker messages as JSON lines over stdin/stdout
    Worker,
    /// Ask the recalculation endpoint for an updated graph
    Recalculate(RecalculateArgs),
}

/// Options shared by commands that read a graph and write JSON
#[derive(ClapArgs, Debug)]
pub struct GraphIo {
    /// Graph file with `nodes` and `edges` arrays
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub io: GraphIo,

    /// Horizontal layout center
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub center_x: f64,

    /// Vertical layout center
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub center_y: f64,

    /// Viewport to cull against after layout: left,right,top,bottom
    #[arg(long, allow_hyphen_values = true, value_name = "L,R,T,B")]
    pub bounds: Option<Bounds>,

    /// Spatial index cell size (overrides config)
    #[arg(long)]
    pub grid_size: Option<f64>,

    /// Layout cache signature: coarse or structural (overrides config)
    #[arg(long)]
    pub signature: Option<SignatureStrategy>,
}

#[derive(ClapArgs, Debug)]
pub struct CullArgs {
    #[command(flatten)]
    pub io: GraphIo,

    /// Viewport: left,right,top,bottom
    #[arg(long, allow_hyphen_values = true, value_name = "L,R,T,B")]
    pub bounds: Bounds,

    /// Spatial index cell size (overrides config)
    #[arg(long)]
    pub grid_size: Option<f64>,
}

#[derive(ClapArgs, Debug)]
pub struct RecalculateArgs {
    #[command(flatten)]
    pub io: GraphIo,

    /// Traversal depth below the anchor nodes
    #[arg(short, long, default_value_t = 2)]
    pub depth: u32,

    /// User profile the recommendations are computed for
    #[arg(short, long, default_value = "")]
    pub profile: String,

    /// Request priority: low, normal or high
    #[arg(long, default_value = "normal")]
    pub priority: RecalculationPriority,

    /// API base URL (overrides config and CAREER_TREE_API_BASE)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Bypass the recalculation cache
    #[arg(long)]
    pub no_cache: bool,

    /// Fail instead of answering a missing endpoint with a local mock result
    #[arg(long)]
    pub no_mock_fallback: bool,
}

impl Args {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
