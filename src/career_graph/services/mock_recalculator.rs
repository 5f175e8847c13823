use crate::career_graph::domain::{Edge, Node, Position, TreeAdjacency};
use rand::Rng;
use std::collections::HashSet;

/// Maximum position jitter applied to every kept node, in canvas units
const POSITION_JITTER: f64 = 10.0;

/// Lowest confidence score assigned by the mock
const MIN_MOCK_CONFIDENCE: f64 = 0.5;

/// Output of a local mock recalculation
#[derive(Debug, Clone, PartialEq)]
pub struct MockRecalculation {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Mean of the assigned node confidence scores (0 for an empty result)
    pub confidence: f64,
}

/// MockRecalculator service - development stand-in for the remote recalculation
///
/// Keeps nodes within `depth` hops below an anchor, jitters their positions and
/// assigns random confidence scores. The output is not derived from any model and
/// must never be presented as authoritative.
pub struct MockRecalculator;

impl MockRecalculator {
    pub fn recalculate<R: Rng>(
        nodes: &[Node],
        edges: &[Edge],
        depth: u32,
        rng: &mut R,
    ) -> MockRecalculation {
        let anchors: HashSet<&str> = nodes
            .iter()
            .filter(|node| node.is_anchor)
            .map(|node| node.id.as_str())
            .collect();
        let members: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        let adjacency = TreeAdjacency::from_edges(edges, &members);

        let within_depth = |node: &Node| {
            // Without anchors there is nothing to measure depth from; keep everything
            anchors.is_empty()
                || adjacency
                    .depth_from_anchor(&node.id, &anchors)
                    .is_some_and(|hops| hops <= depth as usize)
        };

        let mut kept = Vec::new();
        let mut total_confidence = 0.0;
        for node in nodes.iter().filter(|node| within_depth(*node)) {
            let jitter = Position::new(
                node.position.x + rng.gen_range(-POSITION_JITTER..POSITION_JITTER),
                node.position.y + rng.gen_range(-POSITION_JITTER..POSITION_JITTER),
            );
            let mut updated = node.placed_at(jitter);
            let confidence = rng.gen_range(MIN_MOCK_CONFIDENCE..1.0);
            updated.set_confidence(confidence);
            total_confidence += confidence;
            kept.push(updated);
        }

        let kept_ids: HashSet<&str> = kept.iter().map(|node| node.id.as_str()).collect();
        let kept_edges: Vec<Edge> = edges
            .iter()
            .filter(|edge| {
                kept_ids.contains(edge.source.as_str()) && kept_ids.contains(edge.target.as_str())
            })
            .cloned()
            .collect();

        let confidence = if kept.is_empty() {
            0.0
        } else {
            total_confidence / kept.len() as f64
        };

        MockRecalculation {
            nodes: kept,
            edges: kept_edges,
            confidence,
        }
    }
}
