use super::{Edge, Node};
use serde::{Deserialize, Serialize};

/// Node and edge lists as exchanged with the UI and stored in graph files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn visible_node_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.visible).count()
    }
}
