mod cli;

use career_tree::adapters::inbound::serve_json_lines;
use career_tree::adapters::outbound::console::StderrProgressReporter;
use career_tree::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, StdoutPresenter,
};
use career_tree::adapters::outbound::network::{
    CachingRecalculationClient, EnvTokenProvider, GraphRecalculationClient,
};
use career_tree::adapters::outbound::worker::LayoutWorker;
use career_tree::application::dto::{RecalculationOptions, RecalculationRequest, RenderRequest};
use career_tree::application::use_cases::{GraphViewSession, RenderTreeUseCase};
use career_tree::career_graph::domain::Position;
use career_tree::career_graph::services::RadialLayoutEngine;
use career_tree::config::{self, Settings};
use career_tree::ports::inbound::{GraphViewPort, RecalculationPort};
use career_tree::ports::outbound::{GraphSource, OutputPresenter, ProgressReporter};
use career_tree::shared::error::ExitCode;
use career_tree::shared::Result;
use cli::{Args, Command, CullArgs, LayoutArgs, RecalculateArgs};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured API base
const API_BASE_ENV: &str = "CAREER_TREE_API_BASE";

#[tokio::main]
async fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, with a success kind
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(args.verbose);

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n{} An error occurred:\n", "❌".red());
            eprintln!("{}", e.red());

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\n{} {}", "Caused by:".yellow(), cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(args.config.as_deref())?;
    debug!(?settings, "Resolved settings");

    match args.command {
        Command::Layout(layout) => run_layout(layout, &settings).await,
        Command::Cull(cull) => run_cull(cull, &settings),
        Command::Worker => run_worker(&settings).await,
        Command::Recalculate(recalculate) => run_recalculate(recalculate, &settings).await,
    }
}

/// Explicit `--config` first, then `career-tree.config.yml` in the working directory
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let config = match config_path {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };

    Ok(match config {
        Some(config) => {
            info!("Loaded configuration file");
            Settings::from_config(&config)
        }
        None => Settings::default(),
    })
}

fn layout_engine(settings: &Settings) -> RadialLayoutEngine {
    RadialLayoutEngine::new(settings.ring_geometry, settings.signature)
}

fn presenter_for(output: Option<PathBuf>) -> Box<dyn OutputPresenter> {
    match output {
        Some(path) => Box::new(FileSystemWriter::new(path)),
        None => Box::new(StdoutPresenter::new()),
    }
}

async fn run_layout(args: LayoutArgs, settings: &Settings) -> Result<ExitCode> {
    let graph = FileSystemReader::new().read_graph(&args.io.input)?;

    let mut settings = settings.clone();
    if let Some(signature) = args.signature {
        settings.signature = signature;
    }
    let grid_size = args.grid_size.unwrap_or(settings.grid_size);

    let worker = LayoutWorker::spawn(GraphViewSession::new(layout_engine(&settings)))?;
    let use_case = RenderTreeUseCase::new(worker.clone(), StderrProgressReporter::new());

    let mut request = RenderRequest::new(graph)
        .with_center(Position::new(args.center_x, args.center_y))
        .with_grid_size(grid_size);
    if let Some(bounds) = args.bounds {
        request = request.with_bounds(bounds);
    }

    let outcome = use_case.execute(request).await;
    worker.shutdown().await?;
    let response = outcome?;

    let mut output = json!({
        "nodes": response.positioned_nodes(),
        "cached": response.layout.cached,
        "elapsedMs": response.layout.elapsed_ms,
        "index": response.index,
    });
    if let Some(visible) = response.visible {
        output["visible"] = serde_json::to_value(visible)?;
    }

    presenter_for(args.io.output).present(&serde_json::to_string_pretty(&output)?)?;
    Ok(ExitCode::Success)
}

fn run_cull(args: CullArgs, settings: &Settings) -> Result<ExitCode> {
    let graph = FileSystemReader::new().read_graph(&args.io.input)?;
    let grid_size = args.grid_size.unwrap_or(settings.grid_size);

    let mut session = GraphViewSession::new(layout_engine(settings));
    let index = session.build_spatial_index(&graph.nodes, grid_size)?;
    let culled = session.cull_viewport(args.bounds, grid_size);
    info!(
        cells = index.cell_count,
        visible = culled.count,
        "Viewport culled"
    );

    presenter_for(args.io.output).present(&serde_json::to_string_pretty(&culled)?)?;
    Ok(ExitCode::Success)
}

async fn run_worker(settings: &Settings) -> Result<ExitCode> {
    let worker = LayoutWorker::spawn(GraphViewSession::new(layout_engine(settings)))?;

    let served = serve_json_lines(
        &worker,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;
    worker.shutdown().await?;

    let summary = served?;
    info!(
        messages = summary.messages,
        errors = summary.errors,
        "Worker session finished"
    );
    Ok(ExitCode::Success)
}

/// `--api-base`, then `CAREER_TREE_API_BASE`, then the config file
fn resolve_api_base(flag: Option<String>, settings: &Settings) -> Result<String> {
    let api_base = flag
        .or_else(|| {
            std::env::var(API_BASE_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| settings.api_base.clone());
    config::validate_api_base(&api_base)?;
    Ok(api_base)
}

async fn run_recalculate(args: RecalculateArgs, settings: &Settings) -> Result<ExitCode> {
    let graph = FileSystemReader::new().read_graph(&args.io.input)?;
    let api_base = resolve_api_base(args.api_base, settings)?;
    let reporter = StderrProgressReporter::new();

    let mut cache_settings = settings.cache;
    if args.no_mock_fallback {
        cache_settings.mock_fallback = false;
    }

    let client = GraphRecalculationClient::with_timeout(&api_base, settings.timeout)?
        .with_token_provider(Arc::new(EnvTokenProvider::new(settings.api_token_env.as_str())));
    let port = CachingRecalculationClient::new(client, cache_settings);

    let mut options = RecalculationOptions::default().with_priority(args.priority);
    if args.no_cache {
        options = options.without_cache();
    }
    let request = RecalculationRequest::new(graph.nodes, graph.edges, args.depth, args.profile);

    reporter.report(&format!("🔄 Requesting recalculation from {}...", api_base));
    let response = port.recalculate(request, options).await?;

    let code = if response.mock {
        reporter.report_error(
            "Recalculation endpoint not found; the result was generated locally (mock)",
        );
        ExitCode::DegradedResult
    } else {
        reporter.report_completion(&format!(
            "✅ Recalculated {} nodes (confidence {:.2})",
            response.updated_nodes.len(),
            response.confidence
        ));
        ExitCode::Success
    };

    presenter_for(args.io.output).present(&serde_json::to_string_pretty(&response)?)?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_settings_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "grid_size: 125\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.grid_size, 125.0);
    }

    #[test]
    fn test_load_settings_missing_explicit_path_is_error() {
        assert!(load_settings(Some(Path::new("/nonexistent/career-tree.yml"))).is_err());
    }

    #[test]
    fn test_resolve_api_base_prefers_flag() {
        let settings = Settings::default();
        let api_base =
            resolve_api_base(Some("https://api.example.com/v2".to_string()), &settings).unwrap();
        assert_eq!(api_base, "https://api.example.com/v2");
    }

    #[test]
    fn test_resolve_api_base_rejects_bad_flag() {
        let settings = Settings::default();
        assert!(resolve_api_base(Some("localhost".to_string()), &settings).is_err());
    }
}
