use crate::application::dto::{WorkerMessage, WorkerReply};
use crate::shared::Result;
use async_trait::async_trait;

/// LayoutWorkerPort for handing graph-view messages to a background worker
///
/// Replies come back in the order messages were dispatched. Operation
/// failures are reported inside the reply; the `Result` only fails when the
/// worker itself is gone.
#[async_trait]
pub trait LayoutWorkerPort: Send + Sync {
    async fn dispatch(&self, message: WorkerMessage) -> Result<WorkerReply>;
}
