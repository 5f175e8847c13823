use crate::career_graph::domain::{Bounds, Edge, Node};
use crate::career_graph::services::DEFAULT_GRID_SIZE;
use crate::shared::error::CareerTreeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Operations understood by the graph-view worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    BuildSpatialIndex,
    CullViewport,
    CalculateLayout,
    BatchProcess,
    ClearCache,
    GetStats,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::BuildSpatialIndex,
        OperationKind::CullViewport,
        OperationKind::CalculateLayout,
        OperationKind::BatchProcess,
        OperationKind::ClearCache,
        OperationKind::GetStats,
    ];

    /// Wire name used in the `type` field of a message
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::BuildSpatialIndex => "buildSpatialIndex",
            OperationKind::CullViewport => "cullViewport",
            OperationKind::CalculateLayout => "calculateLayout",
            OperationKind::BatchProcess => "batchProcess",
            OperationKind::ClearCache => "clearCache",
            OperationKind::GetStats => "getStats",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = CareerTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CareerTreeError::UnknownOperation {
                name: s.to_string(),
            })
    }
}

/// Inbound worker message: `{ id, type, data }`
///
/// The id is opaque: strings and numbers alike are echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    pub id: Value,
    #[serde(rename = "type")]
    pub operation: String,
    #[serde(default)]
    pub data: Value,
}

impl WorkerMessage {
    pub fn new(id: impl Into<Value>, operation: OperationKind, data: Value) -> Self {
        Self {
            id: id.into(),
            operation: operation.as_str().to_string(),
            data,
        }
    }
}

/// Outcome of one operation, tagged `success` or `error` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyBody {
    Success { result: Value },
    Error { error: String },
}

impl ReplyBody {
    pub fn is_success(&self) -> bool {
        matches!(self, ReplyBody::Success { .. })
    }
}

/// Outbound worker reply: `{ id, type: "success", result }` or `{ id, type: "error", error }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub id: Value,
    #[serde(flatten)]
    pub body: ReplyBody,
}

impl WorkerReply {
    pub fn success(id: impl Into<Value>, result: Value) -> Self {
        Self {
            id: id.into(),
            body: ReplyBody::Success { result },
        }
    }

    pub fn error(id: impl Into<Value>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: ReplyBody::Error {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.body.is_success()
    }

    /// The result payload, or `None` for an error reply
    pub fn result(&self) -> Option<&Value> {
        match &self.body {
            ReplyBody::Success { result } => Some(result),
            ReplyBody::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            ReplyBody::Success { .. } => None,
            ReplyBody::Error { error } => Some(error),
        }
    }
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

/// Payload of `buildSpatialIndex`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildIndexData {
    pub nodes: Vec<Node>,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

/// Payload of `cullViewport`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CullViewportData {
    pub bounds: Bounds,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

/// Payload of `calculateLayout`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateLayoutData {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub center_x: f64,
    #[serde(default)]
    pub center_y: f64,
}

/// One entry of a `batchProcess` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    #[serde(rename = "type")]
    pub operation: String,
    #[serde(default)]
    pub data: Value,
}

impl BatchOperation {
    pub fn new(operation: OperationKind, data: Value) -> Self {
        Self {
            operation: operation.as_str().to_string(),
            data,
        }
    }
}

/// Payload of `batchProcess`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchProcessData {
    pub operations: Vec<BatchOperation>,
}

/// Result of `getStats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub indexed_nodes: usize,
    pub index_cells: usize,
    /// `None` until the first successful build
    pub grid_size: Option<f64>,
    pub layout_cache_entries: usize,
    pub messages_handled: u64,
    pub errors: u64,
}
