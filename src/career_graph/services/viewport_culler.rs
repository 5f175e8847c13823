use super::{elapsed_ms, SpatialIndex};
use crate::career_graph::domain::{Bounds, Node, Position};
use crate::career_graph::policies::NodeFootprint;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

/// Nodes whose footprint intersects a viewport, in cell-scan order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CullResult {
    pub visible_nodes: Vec<Node>,
    pub count: usize,
    pub elapsed_ms: f64,
}

impl CullResult {
    fn empty() -> Self {
        Self {
            visible_nodes: Vec::new(),
            count: 0,
            elapsed_ms: 0.0,
        }
    }
}

/// ViewportCuller service for filtering indexed nodes down to a visible rectangle
///
/// Only the cells overlapping the viewport are scanned. The scanned range is
/// widened by half of the largest footprint, so a node centered just outside the
/// viewport whose box still reaches into it is found.
pub struct ViewportCuller;

impl ViewportCuller {
    /// Returns every indexed node whose footprint intersects `bounds`
    ///
    /// An index that has never been built yields an empty result.
    pub fn cull(index: &SpatialIndex, bounds: Bounds, grid_size: f64) -> CullResult {
        let Some(index_grid) = index.grid_size() else {
            return CullResult::empty();
        };
        if (index_grid - grid_size).abs() > f64::EPSILON {
            warn!(
                requested = grid_size,
                indexed = index_grid,
                "Cull grid size differs from the index grid size; using the index grid"
            );
        }

        let start = Instant::now();
        let viewport = bounds.normalized();
        let reach = NodeFootprint::largest();
        let search = viewport.expanded(reach.width / 2.0, reach.height / 2.0);

        let min = SpatialIndex::cell_key(Position::new(search.left, search.top), index_grid);
        let max = SpatialIndex::cell_key(Position::new(search.right, search.bottom), index_grid);

        let visible_nodes: Vec<Node> = index
            .nodes_in_cell_range(min, max)
            .into_iter()
            .filter(|node| {
                NodeFootprint::for_node(node)
                    .bounds_at(node.position)
                    .intersects(&viewport)
            })
            .cloned()
            .collect();

        CullResult {
            count: visible_nodes.len(),
            visible_nodes,
            elapsed_ms: elapsed_ms(start),
        }
    }
}
