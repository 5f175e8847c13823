use crate::application::dto::{RecalculationPriority, RecalculationRequest, RecalculationResponse};
use crate::shared::error::RecalculationError;
use async_trait::async_trait;

/// RecalculationApi port for the remote graph recalculation endpoint
///
/// One call is one network round-trip. Caching, coalescing and the mock
/// fallback are layered on top by decorators.
///
/// # Async Support
/// Implementations must be `Send + Sync` so that a single client can be
/// shared by concurrent callers.
#[async_trait]
pub trait RecalculationApi: Send + Sync {
    /// Recalculates the recommendation graph for `request`
    ///
    /// # Errors
    /// - `EndpointNotFound` when the endpoint answers 404
    /// - `Http` for any other non-success status
    /// - `Timeout`, `Network` or `InvalidResponse` for transport failures
    async fn recalculate(
        &self,
        request: &RecalculationRequest,
        priority: RecalculationPriority,
    ) -> Result<RecalculationResponse, RecalculationError>;

    /// The endpoint URL, for diagnostics
    fn endpoint(&self) -> String;
}
