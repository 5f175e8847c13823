use crate::career_graph::domain::{Edge, Node, Position};
use crate::shared::hashing::RollingHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// How layout results are keyed in the [`LayoutCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureStrategy {
    /// Node count, edge count and center only.
    ///
    /// Two different graphs with equal counts and center share a cached layout.
    #[default]
    Coarse,
    /// Rolling hash over node ids, flags, positions and edge pairs
    Structural,
}

impl SignatureStrategy {
    pub fn signature(&self, nodes: &[Node], edges: &[Edge], center: Position) -> String {
        match self {
            SignatureStrategy::Coarse => format!(
                "{}:{}:{}:{}",
                nodes.len(),
                edges.len(),
                center.x,
                center.y
            ),
            SignatureStrategy::Structural => {
                let mut hash = RollingHash::new();
                for node in nodes {
                    hash.write_str(&node.id);
                    hash.write_str(&format!(
                        "|{}|{}|{}|{}|{};",
                        node.visible, node.is_anchor, node.position.x, node.position.y,
                        node.kind.as_str()
                    ));
                }
                for edge in edges {
                    hash.write_str(&edge.source);
                    hash.write_str("->");
                    hash.write_str(&edge.target);
                    hash.write_str(";");
                }
                format!(
                    "s:{}:{}:{:08x}:{}:{}",
                    nodes.len(),
                    edges.len(),
                    hash.finish(),
                    center.x,
                    center.y
                )
            }
        }
    }
}

impl FromStr for SignatureStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coarse" => Ok(SignatureStrategy::Coarse),
            "structural" => Ok(SignatureStrategy::Structural),
            _ => Err(format!(
                "Invalid signature strategy: {}. Please specify 'coarse' or 'structural'",
                s
            )),
        }
    }
}

/// Memoized layout results keyed by signature
///
/// Unbounded: entries live until [`LayoutCache::clear`] or until the owning
/// session is dropped.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<String, Vec<Node>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, signature: &str) -> Option<&[Node]> {
        self.entries.get(signature).map(Vec::as_slice)
    }

    pub fn set(&mut self, signature: String, nodes: Vec<Node>) {
        self.entries.insert(signature, nodes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
