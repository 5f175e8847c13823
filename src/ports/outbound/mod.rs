/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, worker thread).
pub mod graph_source;
pub mod layout_worker;
pub mod output_presenter;
pub mod progress_reporter;
pub mod recalculation_api;
pub mod token_provider;

pub use graph_source::GraphSource;
pub use layout_worker::LayoutWorkerPort;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use recalculation_api::RecalculationApi;
pub use token_provider::TokenProvider;
