use crate::application::dto::{OperationKind, WorkerMessage, WorkerReply};
use crate::application::use_cases::GraphViewSession;
use crate::ports::outbound::LayoutWorkerPort;
use crate::shared::error::CareerTreeError;
use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

/// Messages that may wait in the worker queue before senders are back-pressured
const WORKER_QUEUE_DEPTH: usize = 64;

const WORKER_THREAD_NAME: &str = "career-tree-layout";

enum Command {
    Handle {
        message: WorkerMessage,
        reply_to: oneshot::Sender<WorkerReply>,
    },
    Shutdown,
}

/// LayoutWorker runs a [`GraphViewSession`] on a dedicated OS thread
///
/// Messages are processed one at a time in arrival order, so replies come
/// back in request order. The session and its caches live exactly as long
/// as the thread.
pub struct LayoutWorker;

impl LayoutWorker {
    /// Spawns the worker thread and returns a cloneable handle to it
    pub fn spawn(session: GraphViewSession) -> Result<LayoutWorkerHandle> {
        let (sender, mut receiver) = mpsc::channel::<Command>(WORKER_QUEUE_DEPTH);

        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut session = session;
                info!("Layout worker started");
                while let Some(command) = receiver.blocking_recv() {
                    match command {
                        Command::Handle { message, reply_to } => {
                            let reply = session.handle(message);
                            if reply_to.send(reply).is_err() {
                                debug!("Caller stopped waiting for a worker reply");
                            }
                        }
                        Command::Shutdown => break,
                    }
                }
                info!("Layout worker stopped");
            })?;

        Ok(LayoutWorkerHandle {
            sender,
            thread: Arc::new(Mutex::new(Some(thread))),
        })
    }
}

/// Handle for sending messages to a [`LayoutWorker`]
///
/// Dropping every handle stops the worker once its queue is drained.
#[derive(Clone)]
pub struct LayoutWorkerHandle {
    sender: mpsc::Sender<Command>,
    thread: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl LayoutWorkerHandle {
    /// Sends `operation` with a fresh correlation id
    pub async fn call(&self, operation: OperationKind, data: Value) -> Result<WorkerReply> {
        let message = WorkerMessage::new(Uuid::new_v4().to_string(), operation, data);
        self.dispatch(message).await
    }

    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Stops the worker after the messages already queued, then waits for the thread
    ///
    /// Other clones of this handle fail with `WorkerUnavailable` afterwards.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; that is the state we want
        let _ = self.sender.send(Command::Shutdown).await;

        let thread = self
            .thread
            .lock()
            .map_err(|_| anyhow::anyhow!("Layout worker handle lock poisoned"))?
            .take();
        if let Some(thread) = thread {
            tokio::task::spawn_blocking(move || thread.join())
                .await?
                .map_err(|_| anyhow::anyhow!("Layout worker thread panicked"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl LayoutWorkerPort for LayoutWorkerHandle {
    async fn dispatch(&self, message: WorkerMessage) -> Result<WorkerReply> {
        let (reply_to, reply) = oneshot::channel();
        self.sender
            .send(Command::Handle { message, reply_to })
            .await
            .map_err(|_| CareerTreeError::WorkerUnavailable)?;
        Ok(reply.await.map_err(|_| CareerTreeError::WorkerUnavailable)?)
    }
}
