use crate::application::dto::{RecalculationOptions, RecalculationRequest, RecalculationResponse};
use crate::shared::error::RecalculationError;
use async_trait::async_trait;

/// RecalculationPort - Inbound port for requesting a graph recalculation
///
/// Callers see a cached, coalesced view of the remote endpoint.
#[async_trait]
pub trait RecalculationPort: Send + Sync {
    async fn recalculate(
        &self,
        request: RecalculationRequest,
        options: RecalculationOptions,
    ) -> Result<RecalculationResponse, RecalculationError>;
}
