use crate::application::dto::{
    RecalculationParameters, RecalculationPriority, RecalculationRequest, RecalculationResponse,
};
use crate::career_graph::domain::{Edge, Node};
use crate::ports::outbound::{RecalculationApi, TokenProvider};
use crate::shared::error::RecalculationError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Path of the recalculation endpoint below the API base URL
pub const RECALCULATE_PATH: &str = "/graphsage/recalculate";

/// Timeout applied to each recalculation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error body carried into `RecalculationError::Http`
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecalculatePayload<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
    depth: u32,
    user_profile: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a RecalculationParameters>,
    priority: RecalculationPriority,
    timestamp: String,
}

/// GraphRecalculationClient adapter for `POST {api_base}/graphsage/recalculate`
///
/// One call is exactly one HTTP request. There are no retries; failures are
/// mapped onto [`RecalculationError`] so that callers can tell a missing
/// endpoint from a timeout or a server error.
pub struct GraphRecalculationClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl GraphRecalculationClient {
    /// Creates a client for the API rooted at `api_base`
    pub fn new(api_base: &str) -> Result<Self> {
        Self::with_timeout(api_base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_base: &str, timeout: Duration) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("career-tree/{}", version);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", api_base.trim_end_matches('/'), RECALCULATE_PATH),
            timeout,
            token_provider: None,
        })
    }

    /// Attaches a bearer token source consulted before every request
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    fn map_transport_error(&self, error: reqwest::Error) -> RecalculationError {
        if error.is_timeout() {
            RecalculationError::Timeout {
                timeout: self.timeout,
            }
        } else {
            RecalculationError::Network {
                details: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl RecalculationApi for GraphRecalculationClient {
    async fn recalculate(
        &self,
        request: &RecalculationRequest,
        priority: RecalculationPriority,
    ) -> std::result::Result<RecalculationResponse, RecalculationError> {
        let payload = RecalculatePayload {
            nodes: &request.nodes,
            edges: &request.edges,
            depth: request.depth,
            user_profile: &request.user_profile,
            parameters: request.parameters.as_ref(),
            priority,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let mut builder = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = self
            .token_provider
            .as_ref()
            .and_then(|provider| provider.bearer_token())
        {
            builder = builder.bearer_auth(token);
        }

        debug!(
            endpoint = %self.endpoint,
            nodes = request.nodes.len(),
            ?priority,
            "Sending recalculation request"
        );
        let response = builder
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RecalculationError::EndpointNotFound {
                url: self.endpoint.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            } else {
                body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            return Err(RecalculationError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| RecalculationError::InvalidResponse {
            details: e.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}
