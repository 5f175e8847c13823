use async_trait::async_trait;
use career_tree::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock RecalculationApi answering every call with a scripted outcome
///
/// The default outcome echoes the request back with confidence 0.9. Calls
/// take `delay` of (tokio) time so that concurrent callers overlap.
#[derive(Clone)]
pub struct MockRecalculationApi {
    calls: Arc<AtomicUsize>,
    priorities: Arc<Mutex<Vec<RecalculationPriority>>>,
    failure: Option<RecalculationError>,
    delay: Duration,
}

impl MockRecalculationApi {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            priorities: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call fails with `error`
    pub fn failing_with(mut self, error: RecalculationError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Every call answers 404
    pub fn endpoint_missing() -> Self {
        Self::new().failing_with(RecalculationError::EndpointNotFound {
            url: "http://localhost:8000/api/graphsage/recalculate".to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn priorities(&self) -> Vec<RecalculationPriority> {
        self.priorities.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecalculationApi for MockRecalculationApi {
    async fn recalculate(
        &self,
        request: &RecalculationRequest,
        priority: RecalculationPriority,
    ) -> std::result::Result<RecalculationResponse, RecalculationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.priorities.lock().unwrap().push(priority);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(RecalculationResponse {
            updated_nodes: request.nodes.clone(),
            updated_edges: request.edges.clone(),
            confidence: 0.9,
            processing_time: self.delay.as_secs_f64() * 1000.0,
            cache_key: request.cache_key(),
            alternative_paths: None,
            mock: false,
        })
    }

    fn endpoint(&self) -> String {
        "mock://recalculate".to_string()
    }
}
