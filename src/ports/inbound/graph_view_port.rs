use crate::application::dto::SessionStats;
use crate::career_graph::domain::{Bounds, Edge, Node, Position};
use crate::career_graph::services::{CullResult, IndexStats, LayoutResult};
use crate::shared::Result;

/// GraphViewPort - Inbound port for the graph-view operations
///
/// Implemented by the session that owns the spatial index and the layout
/// cache. The worker protocol is a message-level wrapper around this port.
pub trait GraphViewPort {
    /// Rebuilds the spatial index from `nodes`
    ///
    /// # Errors
    /// Returns an error if `grid_size` is not a positive, finite number
    fn build_spatial_index(&mut self, nodes: &[Node], grid_size: f64) -> Result<IndexStats>;

    /// Returns the indexed nodes whose footprint intersects `bounds`
    fn cull_viewport(&self, bounds: Bounds, grid_size: f64) -> CullResult;

    /// Computes (or recalls) the radial layout of `nodes` around `center`
    fn calculate_layout(&mut self, nodes: &[Node], edges: &[Edge], center: Position)
        -> LayoutResult;

    /// Drops the spatial index and every cached layout
    fn clear_caches(&mut self);

    fn stats(&self) -> SessionStats;
}
