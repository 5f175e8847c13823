/// Background worker adapter for graph-view operations
mod layout_worker;

pub use layout_worker::{LayoutWorker, LayoutWorkerHandle};
