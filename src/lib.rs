//! career-tree - layout and recalculation engine for career tree visualizations
//!
//! This library positions career graph nodes on radial rings, culls them
//! against a viewport through a uniform-grid spatial index, and talks to the
//! remote recalculation endpoint through a short-lived coalescing cache,
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`career_graph`): Pure layout, culling and caching logic
//! - **Application Layer** (`application`): The worker session, use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Layout worker thread, HTTP client, console and files
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use career_tree::prelude::*;
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let graph = FileSystemReader::new().read_graph(Path::new("graph.json"))?;
//!
//! let worker = LayoutWorker::spawn(GraphViewSession::default())?;
//! let use_case = RenderTreeUseCase::new(worker.clone(), StderrProgressReporter::new());
//!
//! let request = RenderRequest::new(graph).with_bounds(Bounds::new(-800.0, 800.0, -600.0, 600.0));
//! let response = use_case.execute(request).await?;
//! println!("{} nodes positioned", response.positioned_nodes().len());
//!
//! worker.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod career_graph;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::inbound::{serve_json_lines, JsonLinesSummary};
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::network::{
        CachingRecalculationClient, DebouncedRecalculator, EnvTokenProvider,
        GraphRecalculationClient, RecalculationCacheSettings,
    };
    pub use crate::adapters::outbound::worker::{LayoutWorker, LayoutWorkerHandle};
    pub use crate::application::dto::{
        OperationKind, RecalculationOptions, RecalculationPriority, RecalculationRequest,
        RecalculationResponse, RenderRequest, RenderResponse, WorkerMessage, WorkerReply,
    };
    pub use crate::application::use_cases::{GraphViewSession, RenderTreeUseCase};
    pub use crate::career_graph::domain::{Bounds, Edge, GraphDocument, Node, NodeKind, Position};
    pub use crate::career_graph::services::{
        LayoutCache, RadialLayoutEngine, RingGeometry, SignatureStrategy, SpatialIndex,
        ViewportCuller,
    };
    pub use crate::ports::inbound::{GraphViewPort, RecalculationPort};
    pub use crate::ports::outbound::{
        GraphSource, LayoutWorkerPort, OutputPresenter, ProgressReporter, RecalculationApi,
        TokenProvider,
    };
    pub use crate::shared::error::{CareerTreeError, RecalculationError};
    pub use crate::shared::Result;
}
