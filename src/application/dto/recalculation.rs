use crate::career_graph::domain::{Edge, Node};
use crate::shared::hashing::{hash_hex, hash_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Optional tuning parameters forwarded to the recalculation endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub priority_weights: BTreeMap<String, f64>,
}

impl RecalculationParameters {
    pub fn is_empty(&self) -> bool {
        self.max_nodes.is_none() && self.focus_areas.is_empty() && self.priority_weights.is_empty()
    }
}

/// RecalculationRequest - current graph plus what to recalculate it for
#[derive(Debug, Clone, PartialEq)]
pub struct RecalculationRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Traversal depth below the anchors
    pub depth: u32,
    /// Identifier of the user profile the recommendations are for
    pub user_profile: String,
    pub parameters: Option<RecalculationParameters>,
}

impl RecalculationRequest {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, depth: u32, user_profile: String) -> Self {
        Self {
            nodes,
            edges,
            depth,
            user_profile,
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: RecalculationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Cache key: rolling hash over counts, depth, profile hash and parameters
    ///
    /// Requests with equal counts but different node content share a key.
    pub fn cache_key(&self) -> String {
        let parameters = self
            .parameters
            .as_ref()
            .and_then(|parameters| serde_json::to_string(parameters).ok())
            .unwrap_or_default();
        let summary = format!(
            "{}|{}|{}|{:08x}|{}",
            self.nodes.len(),
            self.edges.len(),
            self.depth,
            hash_string(&self.user_profile),
            parameters
        );
        hash_hex(&summary)
    }
}

/// Scheduling hint sent along with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalculationPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl FromStr for RecalculationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RecalculationPriority::Low),
            "normal" => Ok(RecalculationPriority::Normal),
            "high" => Ok(RecalculationPriority::High),
            _ => Err(format!(
                "Invalid priority: {}. Please specify 'low', 'normal' or 'high'",
                s
            )),
        }
    }
}

/// Per-call options of a recalculation
#[derive(Debug, Clone)]
pub struct RecalculationOptions {
    /// Serve a fresh cached response when one exists
    pub use_cache: bool,
    pub priority: RecalculationPriority,
    /// Cancelling this token aborts the call with `RecalculationError::Cancelled`
    pub cancel: Option<CancellationToken>,
}

impl Default for RecalculationOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            priority: RecalculationPriority::Normal,
            cancel: None,
        }
    }
}

impl RecalculationOptions {
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_priority(mut self, priority: RecalculationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// RecalculationResponse - updated graph returned by the endpoint (or the mock)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationResponse {
    #[serde(default)]
    pub updated_nodes: Vec<Node>,
    #[serde(default)]
    pub updated_edges: Vec<Edge>,
    #[serde(default)]
    pub confidence: f64,
    /// Server-side processing time in milliseconds
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub cache_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_paths: Option<Vec<Value>>,
    /// Set when the response came from the local mock instead of the endpoint
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career_graph::domain::NodeKind;
    use serde_json::json;

    fn request(profile: &str) -> RecalculationRequest {
        RecalculationRequest::new(
            vec![Node::anchor("root"), Node::new("a", NodeKind::Skill)],
            vec![Edge::new("root", "a")],
            2,
            profile.to_string(),
        )
    }

    #[test]
    fn test_cache_key_is_stable() {
        assert_eq!(request("abc").cache_key(), request("abc").cache_key());
        assert_eq!(request("abc").cache_key().len(), 8);
    }

    #[test]
    fn test_cache_key_depends_on_profile_depth_and_parameters() {
        let base = request("abc").cache_key();
        assert_ne!(base, request("abd").cache_key());

        let mut deeper = request("abc");
        deeper.depth = 3;
        assert_ne!(base, deeper.cache_key());

        let focused = request("abc").with_parameters(RecalculationParameters {
            focus_areas: vec!["healthcare".to_string()],
            ..Default::default()
        });
        assert_ne!(base, focused.cache_key());
    }

    #[test]
    fn test_cache_key_ignores_node_content() {
        let mut other = request("abc");
        other.nodes[1].id = "b".to_string();
        assert_eq!(request("abc").cache_key(), other.cache_key());
    }

    #[test]
    fn test_parameters_serialize_camel_case() {
        let mut weights = BTreeMap::new();
        weights.insert("salary".to_string(), 0.7);
        let parameters = RecalculationParameters {
            max_nodes: Some(25),
            focus_areas: vec!["nursing".to_string()],
            priority_weights: weights,
        };
        assert_eq!(
            serde_json::to_value(&parameters).unwrap(),
            json!({
                "maxNodes": 25,
                "focusAreas": ["nursing"],
                "priorityWeights": { "salary": 0.7 }
            })
        );
        assert!(!parameters.is_empty());
        assert!(RecalculationParameters::default().is_empty());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("HIGH".parse::<RecalculationPriority>().unwrap(), RecalculationPriority::High);
        assert_eq!("low".parse::<RecalculationPriority>().unwrap(), RecalculationPriority::Low);
        assert!("urgent".parse::<RecalculationPriority>().is_err());
    }

    #[test]
    fn test_options_default() {
        let options = RecalculationOptions::default();
        assert!(options.use_cache);
        assert_eq!(options.priority, RecalculationPriority::Normal);
        assert!(options.cancel.is_none());
        assert!(!options.without_cache().use_cache);
    }

    #[test]
    fn test_response_deserialize_wire_shape() {
        let response: RecalculationResponse = serde_json::from_value(json!({
            "updatedNodes": [{ "id": "a", "type": "skill", "data": { "confidence": 0.9 } }],
            "updatedEdges": [{ "source": "root", "target": "a" }],
            "confidence": 0.87,
            "processingTime": 412.5,
            "cacheKey": "srv-123",
            "alternativePaths": [["root", "a"]]
        }))
        .unwrap();

        assert_eq!(response.updated_nodes.len(), 1);
        assert_eq!(response.updated_edges.len(), 1);
        assert_eq!(response.confidence, 0.87);
        assert_eq!(response.cache_key, "srv-123");
        assert_eq!(response.alternative_paths.as_ref().map(Vec::len), Some(1));
        assert!(!response.mock);
    }

    #[test]
    fn test_response_mock_flag_only_serialized_when_set() {
        let mut response = RecalculationResponse {
            updated_nodes: vec![],
            updated_edges: vec![],
            confidence: 0.0,
            processing_time: 0.0,
            cache_key: "k".to_string(),
            alternative_paths: None,
            mock: false,
        };
        assert!(serde_json::to_value(&response).unwrap().get("mock").is_none());
        response.mock = true;
        assert_eq!(serde_json::to_value(&response).unwrap()["mock"], true);
    }
}
