use super::Edge;
use std::collections::{HashMap, HashSet};

/// Forward (parent -> children) and reverse (child -> parent) maps of a node set
///
/// Only edges whose endpoints are both members of the node set are kept; the
/// rest are dropped silently.
#[derive(Debug, Clone, Default)]
pub struct TreeAdjacency {
    children: HashMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    edge_count: usize,
}

impl TreeAdjacency {
    pub fn from_edges(edges: &[Edge], members: &HashSet<&str>) -> Self {
        let mut adjacency = Self::default();

        for edge in edges {
            if !members.contains(edge.source.as_str()) || !members.contains(edge.target.as_str())
            {
                continue;
            }

            adjacency
                .children
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
            // Last edge into a node wins
            adjacency
                .parents
                .insert(edge.target.clone(), edge.source.clone());
            adjacency.edge_count += 1;
        }

        adjacency
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// Number of edges that survived the membership filter
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Hops from `id` up the parent chain to the nearest anchor
    ///
    /// Returns `None` when the chain ends (or cycles) without reaching an anchor.
    pub fn depth_from_anchor(&self, id: &str, anchors: &HashSet<&str>) -> Option<usize> {
        let mut current = id;
        let mut visited = HashSet::new();
        let mut depth = 0;

        loop {
            if anchors.contains(current) {
                return Some(depth);
            }
            if !visited.insert(current) {
                return None;
            }
            current = self.parent_of(current)?;
            depth += 1;
        }
    }
}
