use super::elapsed_ms;
use crate::career_graph::domain::{Node, Position};
use crate::shared::error::CareerTreeError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Grid cell size used when a caller does not specify one
pub const DEFAULT_GRID_SIZE: f64 = 500.0;

/// `(floor(x / grid), floor(y / grid))`
pub type CellKey = (i64, i64);

/// Statistics returned by [`SpatialIndex::build`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub cell_count: usize,
    pub node_count: usize,
    pub grid_size: f64,
    pub elapsed_ms: f64,
}

/// Uniform-grid bucketing of nodes by center position
///
/// Every node lives in exactly one cell. The index is rebuilt wholesale; there
/// is no incremental update, so it must be rebuilt after nodes move.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    grid_size: Option<f64>,
    cells: HashMap<CellKey, Vec<Node>>,
    node_count: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_key(position: Position, grid_size: f64) -> CellKey {
        (
            (position.x / grid_size).floor() as i64,
            (position.y / grid_size).floor() as i64,
        )
    }

    /// Replaces the index contents with `nodes` bucketed by `grid_size`
    ///
    /// # Errors
    /// Returns an error if `grid_size` is not a positive, finite number.
    /// The previous index is left untouched in that case.
    pub fn build(&mut self, nodes: &[Node], grid_size: f64) -> Result<IndexStats> {
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(CareerTreeError::InvalidGridSize { grid_size }.into());
        }

        let start = Instant::now();
        let mut cells: HashMap<CellKey, Vec<Node>> = HashMap::new();
        for node in nodes {
            cells
                .entry(Self::cell_key(node.position, grid_size))
                .or_default()
                .push(node.clone());
        }

        self.cells = cells;
        self.grid_size = Some(grid_size);
        self.node_count = nodes.len();

        Ok(IndexStats {
            cell_count: self.cells.len(),
            node_count: self.node_count,
            grid_size,
            elapsed_ms: elapsed_ms(start),
        })
    }

    pub fn is_built(&self) -> bool {
        self.grid_size.is_some()
    }

    /// Grid size of the last successful build
    pub fn grid_size(&self) -> Option<f64> {
        self.grid_size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn cell(&self, key: CellKey) -> Option<&[Node]> {
        self.cells.get(&key).map(Vec::as_slice)
    }

    /// Nodes of every cell in the inclusive key range `min..=max`
    ///
    /// Walks the range row by row when it is smaller than the number of
    /// occupied cells; otherwise filters the occupied cells in key order.
    pub fn nodes_in_cell_range(&self, min: CellKey, max: CellKey) -> Vec<&Node> {
        if min.0 > max.0 || min.1 > max.1 {
            return Vec::new();
        }

        let span_x = (max.0 as i128 - min.0 as i128 + 1) as u128;
        let span_y = (max.1 as i128 - min.1 as i128 + 1) as u128;
        let range_cells = span_x.saturating_mul(span_y);

        if range_cells <= self.cells.len() as u128 {
            let mut found = Vec::new();
            for cx in min.0..=max.0 {
                for cy in min.1..=max.1 {
                    if let Some(nodes) = self.cells.get(&(cx, cy)) {
                        found.extend(nodes.iter());
                    }
                }
            }
            return found;
        }

        let mut keys: Vec<&CellKey> = self
            .cells
            .keys()
            .filter(|(cx, cy)| (min.0..=max.0).contains(cx) && (min.1..=max.1).contains(cy))
            .collect();
        keys.sort();
        keys.into_iter()
            .flat_map(|key| self.cells[key].iter())
            .collect()
    }

    /// Drops every cell and forgets the grid size
    pub fn clear(&mut self) {
        self.cells.clear();
        self.grid_size = None;
        self.node_count = 0;
    }
}
