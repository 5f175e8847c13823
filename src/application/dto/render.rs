use crate::career_graph::domain::{Bounds, GraphDocument, Node, Position};
use crate::career_graph::services::{CullResult, IndexStats, LayoutResult, DEFAULT_GRID_SIZE};

/// Request for rendering one frame of the career tree
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub graph: GraphDocument,
    /// Viewport to cull against; `None` skips culling
    pub bounds: Option<Bounds>,
    pub center: Position,
    pub grid_size: f64,
}

impl RenderRequest {
    pub fn new(graph: GraphDocument) -> Self {
        Self {
            graph,
            bounds: None,
            center: Position::default(),
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_center(mut self, center: Position) -> Self {
        self.center = center;
        self
    }

    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }
}

/// Positioned and visible nodes returned by the render use case
#[derive(Debug, Clone)]
pub struct RenderResponse {
    pub index: IndexStats,
    pub layout: LayoutResult,
    pub visible: Option<CullResult>,
}

impl RenderResponse {
    pub fn positioned_nodes(&self) -> &[Node] {
        &self.layout.nodes
    }

    pub fn visible_nodes(&self) -> Option<&[Node]> {
        self.visible.as_ref().map(|cull| cull.visible_nodes.as_slice())
    }
}
