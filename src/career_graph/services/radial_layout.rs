use super::{elapsed_ms, LayoutCache, SignatureStrategy};
use crate::career_graph::domain::{Edge, Node, Position, TreeAdjacency};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;
use std::time::Instant;
use tracing::debug;

/// Ring geometry of the radial layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Radius of the first ring of children
    pub base_radius: f64,
    /// Added radius per further ring
    pub ring_spacing: f64,
    /// Radius of the circle shared by several anchors
    pub anchor_radius: f64,
    /// Number of breadth-first rings before the outer fallback ring
    pub max_levels: usize,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            base_radius: 400.0,
            ring_spacing: 300.0,
            anchor_radius: 200.0,
            max_levels: 3,
        }
    }
}

impl RingGeometry {
    pub fn ring_radius(&self, level: usize) -> f64 {
        self.base_radius + level as f64 * self.ring_spacing
    }
}

/// Positioned nodes produced by [`RadialLayoutEngine::layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub cached: bool,
    pub elapsed_ms: f64,
}

/// RadialLayoutEngine service placing anchors centrally and descendants on rings
///
/// Placement order:
/// 1. Anchors: one anchor sits on the center, several share a circle around it
/// 2. Up to `max_levels` breadth-first rings of children of already placed nodes
/// 3. One outer ring for every visible node still unplaced
///
/// Hidden nodes are left out of the result. The algorithm has no randomness:
/// equal inputs give equal positions.
#[derive(Debug, Clone, Default)]
pub struct RadialLayoutEngine {
    geometry: RingGeometry,
    signature: SignatureStrategy,
}

impl RadialLayoutEngine {
    pub fn new(geometry: RingGeometry, signature: SignatureStrategy) -> Self {
        Self {
            geometry,
            signature,
        }
    }

    pub fn geometry(&self) -> &RingGeometry {
        &self.geometry
    }

    /// Lays out `nodes` around `center`, consulting and filling `cache`
    pub fn layout(
        &self,
        cache: &mut LayoutCache,
        nodes: &[Node],
        edges: &[Edge],
        center: Position,
    ) -> LayoutResult {
        let signature = self.signature.signature(nodes, edges, center);
        if let Some(cached) = cache.get(&signature) {
            debug!(%signature, "Layout cache hit");
            return LayoutResult {
                nodes: cached.to_vec(),
                cached: true,
                elapsed_ms: 0.0,
            };
        }

        let start = Instant::now();
        let visible: Vec<&Node> = nodes.iter().filter(|node| node.visible).collect();
        let by_id: HashMap<&str, &Node> = visible
            .iter()
            .map(|node| (node.id.as_str(), *node))
            .collect();
        let members: HashSet<&str> = by_id.keys().copied().collect();

        let mut positioned: Vec<Node> = Vec::with_capacity(visible.len());
        let mut processed: HashSet<String> = HashSet::new();

        self.place_anchors(&visible, center, &mut positioned, &mut processed);

        let adjacency = TreeAdjacency::from_edges(edges, &members);
        let mut level = 0;
        while level < self.geometry.max_levels {
            let children = Self::unplaced_children(&positioned, &adjacency, &processed);
            if children.is_empty() {
                break;
            }

            let ring: Vec<&Node> = children.iter().map(|id| by_id[id]).collect();
            Self::place_on_ring(
                &ring,
                center,
                self.geometry.ring_radius(level),
                &mut positioned,
                &mut processed,
            );
            level += 1;
        }

        let stragglers: Vec<&Node> = visible
            .iter()
            .copied()
            .filter(|node| !processed.contains(&node.id))
            .collect();
        if !stragglers.is_empty() {
            debug!(
                count = stragglers.len(),
                level, "Placing unreached nodes on the outer ring"
            );
            Self::place_on_ring(
                &stragglers,
                center,
                self.geometry.ring_radius(level),
                &mut positioned,
                &mut processed,
            );
        }

        cache.set(signature, positioned.clone());

        LayoutResult {
            nodes: positioned,
            cached: false,
            elapsed_ms: elapsed_ms(start),
        }
    }

    fn place_anchors(
        &self,
        visible: &[&Node],
        center: Position,
        positioned: &mut Vec<Node>,
        processed: &mut HashSet<String>,
    ) {
        let anchors: Vec<&Node> = visible.iter().copied().filter(|node| node.is_anchor).collect();
        match anchors.len() {
            0 => {}
            1 => {
                positioned.push(anchors[0].placed_at(center));
                processed.insert(anchors[0].id.clone());
            }
            _ => Self::place_on_ring(
                &anchors,
                center,
                self.geometry.anchor_radius,
                positioned,
                processed,
            ),
        }
    }

    /// Children of placed nodes that are not placed yet, deduplicated, in discovery order
    fn unplaced_children<'a>(
        positioned: &[Node],
        adjacency: &'a TreeAdjacency,
        processed: &HashSet<String>,
    ) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for parent in positioned {
            for child in adjacency.children_of(&parent.id) {
                if !processed.contains(child) && seen.insert(child.as_str()) {
                    children.push(child.as_str());
                }
            }
        }
        children
    }

    /// Spreads `ring` evenly on a circle, starting at angle 0
    fn place_on_ring(
        ring: &[&Node],
        center: Position,
        radius: f64,
        positioned: &mut Vec<Node>,
        processed: &mut HashSet<String>,
    ) {
        let count = ring.len() as f64;
        for (i, node) in ring.iter().enumerate() {
            let angle = TAU * i as f64 / count;
            positioned.push(node.placed_at(center.offset_polar(radius, angle)));
            processed.insert(node.id.clone());
        }
    }
}
