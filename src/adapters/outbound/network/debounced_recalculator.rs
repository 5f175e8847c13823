use crate::application::dto::{RecalculationOptions, RecalculationRequest, RecalculationResponse};
use crate::ports::inbound::RecalculationPort;
use crate::shared::error::RecalculationError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

type RecalculationOutcome = Result<RecalculationResponse, RecalculationError>;

/// Quiet period before a debounced recalculation fires
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct PendingCall {
    generation: u64,
    reply_to: oneshot::Sender<RecalculationOutcome>,
    timer: JoinHandle<()>,
}

/// DebouncedRecalculator holds one timer per caller-chosen key
///
/// A call replaces the pending timer of its key: only the last call within
/// the quiet period reaches the wrapped port, with that call's request. The
/// replaced callers resolve with `RecalculationError::Superseded`. Once a
/// timer has fired its recalculation runs to completion; a later call for the
/// key starts a new timer.
pub struct DebouncedRecalculator<P: RecalculationPort + 'static> {
    port: Arc<P>,
    delay: Duration,
    pending: Arc<Mutex<HashMap<String, PendingCall>>>,
    next_generation: AtomicU64,
}

impl<P: RecalculationPort + 'static> DebouncedRecalculator<P> {
    pub fn new(port: Arc<P>, delay: Duration) -> Self {
        Self {
            port,
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Number of keys whose timer has not fired yet
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Schedules a recalculation under `key`, superseding any pending one
    pub async fn recalculate_debounced(
        &self,
        key: &str,
        request: RecalculationRequest,
        options: RecalculationOptions,
    ) -> RecalculationOutcome {
        let (reply_to, reply) = oneshot::channel();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut pending = lock(&self.pending);
            if let Some(previous) = pending.remove(key) {
                debug!(key, "Debounced recalculation superseded");
                previous.timer.abort();
                let _ = previous.reply_to.send(Err(RecalculationError::Superseded));
            }

            let timer = tokio::spawn(fire_after(
                Arc::clone(&self.port),
                Arc::clone(&self.pending),
                key.to_string(),
                generation,
                self.delay,
                request,
                options,
            ));
            pending.insert(
                key.to_string(),
                PendingCall {
                    generation,
                    reply_to,
                    timer,
                },
            );
        }

        // A dropped sender means the timer task died without answering
        reply.await.unwrap_or(Err(RecalculationError::Cancelled))
    }
}

async fn fire_after<P: RecalculationPort + 'static>(
    port: Arc<P>,
    pending: Arc<Mutex<HashMap<String, PendingCall>>>,
    key: String,
    generation: u64,
    delay: Duration,
    request: RecalculationRequest,
    options: RecalculationOptions,
) {
    tokio::time::sleep(delay).await;

    let reply_to = {
        let mut pending = lock(&pending);
        let still_current = pending
            .get(&key)
            .is_some_and(|call| call.generation == generation);
        if still_current {
            pending.remove(&key).map(|call| call.reply_to)
        } else {
            None
        }
    };
    let Some(reply_to) = reply_to else {
        return;
    };

    debug!(%key, "Debounce window elapsed; recalculating");
    let outcome = port.recalculate(request, options).await;
    let _ = reply_to.send(outcome);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career_graph::domain::{Node, NodeKind};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Records the depth of every request it receives
    #[derive(Default)]
    struct RecordingPort {
        calls: AtomicUsize,
        depths: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl RecalculationPort for RecordingPort {
        async fn recalculate(
            &self,
            request: RecalculationRequest,
            _options: RecalculationOptions,
        ) -> RecalculationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.depths.lock().unwrap().push(request.depth);
            Ok(RecalculationResponse {
                updated_nodes: request.nodes,
                updated_edges: request.edges,
                confidence: 1.0,
                processing_time: 0.0,
                cache_key: request.depth.to_string(),
                alternative_paths: None,
                mock: false,
            })
        }
    }

    fn request(depth: u32) -> RecalculationRequest {
        RecalculationRequest::new(
            vec![Node::new("a", NodeKind::Skill)],
            vec![],
            depth,
            "abc".to_string(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_calls_execute_once_with_last_parameters() {
        let debouncer =
            DebouncedRecalculator::new(Arc::new(RecordingPort::default()), DEFAULT_DEBOUNCE);

        let (first, second, third) = tokio::join!(
            debouncer.recalculate_debounced("graph", request(1), RecalculationOptions::default()),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                debouncer
                    .recalculate_debounced("graph", request(2), RecalculationOptions::default())
                    .await
            },
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                debouncer
                    .recalculate_debounced("graph", request(3), RecalculationOptions::default())
                    .await
            },
        );

        assert_eq!(first.unwrap_err(), RecalculationError::Superseded);
        assert_eq!(second.unwrap_err(), RecalculationError::Superseded);
        assert_eq!(third.unwrap().cache_key, "3");
        assert_eq!(debouncer.port().calls.load(Ordering::SeqCst), 1);
        assert_eq!(*debouncer.port().depths.lock().unwrap(), vec![3]);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer =
            DebouncedRecalculator::new(Arc::new(RecordingPort::default()), DEFAULT_DEBOUNCE);

        let (a, b) = tokio::join!(
            debouncer.recalculate_debounced("left", request(1), RecalculationOptions::default()),
            debouncer.recalculate_debounced("right", request(2), RecalculationOptions::default()),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(debouncer.port().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_spaced_beyond_delay_each_execute() {
        let debouncer =
            DebouncedRecalculator::new(Arc::new(RecordingPort::default()), DEFAULT_DEBOUNCE);

        debouncer
            .recalculate_debounced("graph", request(1), RecalculationOptions::default())
            .await
            .unwrap();
        debouncer
            .recalculate_debounced("graph", request(2), RecalculationOptions::default())
            .await
            .unwrap();
        assert_eq!(*debouncer.port().depths.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_the_quiet_period() {
        let debouncer =
            DebouncedRecalculator::new(Arc::new(RecordingPort::default()), DEFAULT_DEBOUNCE);
        let start = tokio::time::Instant::now();

        debouncer
            .recalculate_debounced("graph", request(1), RecalculationOptions::default())
            .await
            .unwrap();
        assert!(start.elapsed() >= DEFAULT_DEBOUNCE);
    }
}
