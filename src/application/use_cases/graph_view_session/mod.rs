use crate::application::dto::{
    BatchProcessData, BuildIndexData, CalculateLayoutData, CullViewportData, OperationKind,
    ReplyBody, SessionStats, WorkerMessage, WorkerReply,
};
use crate::career_graph::domain::{Bounds, Edge, Node, Position};
use crate::career_graph::services::{
    CullResult, IndexStats, LayoutCache, LayoutResult, RadialLayoutEngine, SpatialIndex,
    ViewportCuller,
};
use crate::ports::inbound::GraphViewPort;
use crate::shared::error::CareerTreeError;
use crate::shared::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};


/// GraphViewSession - explicitly owned state of one graph-view worker
///
/// Holds the spatial index, the layout cache and message counters. Every
/// operation runs synchronously against this state; the worker thread owns
/// exactly one session and drops it on shutdown.
#[derive(Debug, Default)]
pub struct GraphViewSession {
    index: SpatialIndex,
    layout_cache: LayoutCache,
    engine: RadialLayoutEngine,
    messages_handled: u64,
    errors: u64,
}

impl GraphViewSession {
    pub fn new(engine: RadialLayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Handles one protocol message and builds the correlated reply
    ///
    /// Operation failures never escape: they become an error reply carrying
    /// the message id.
    pub fn handle(&mut self, message: WorkerMessage) -> WorkerReply {
        self.messages_handled += 1;
        match self.execute(&message.operation, message.data, false) {
            Ok(result) => WorkerReply::success(message.id, result),
            Err(err) => {
                warn!(
                    id = %message.id,
                    operation = %message.operation,
                    error = %err,
                    "Worker operation failed"
                );
                WorkerReply::error(message.id, err.to_string())
            }
        }
    }

    /// Drops every piece of state, as if the session had just been created
    pub fn reset(&mut self) {
        self.index.clear();
        self.layout_cache.clear();
        self.messages_handled = 0;
        self.errors = 0;
    }

    fn execute(&mut self, operation: &str, data: Value, nested: bool) -> Result<Value> {
        let outcome = self.dispatch(operation, data, nested);
        if outcome.is_err() {
            self.errors += 1;
        }
        outcome
    }

    fn dispatch(&mut self, operation: &str, data: Value, nested: bool) -> Result<Value> {
        let kind: OperationKind = operation.parse()?;
        debug!(operation = %kind, nested, "Executing worker operation");

        match kind {
            OperationKind::BuildSpatialIndex => {
                let payload: BuildIndexData = parse_payload(kind, data)?;
                let stats = self.build_spatial_index(&payload.nodes, payload.grid_size)?;
                Ok(serde_json::to_value(stats)?)
            }
            OperationKind::CullViewport => {
                let payload: CullViewportData = parse_payload(kind, data)?;
                if !payload.bounds.is_finite() {
                    return Err(CareerTreeError::InvalidPayload {
                        operation: kind.to_string(),
                        details: "bounds must be finite numbers".to_string(),
                    }
                    .into());
                }
                let result = self.cull_viewport(payload.bounds, payload.grid_size);
                Ok(serde_json::to_value(result)?)
            }
            OperationKind::CalculateLayout => {
                let payload: CalculateLayoutData = parse_payload(kind, data)?;
                let center = Position::new(payload.center_x, payload.center_y);
                if !center.is_finite() {
                    return Err(CareerTreeError::InvalidPayload {
                        operation: kind.to_string(),
                        details: "centerX and centerY must be finite numbers".to_string(),
                    }
                    .into());
                }
                let result = self.calculate_layout(&payload.nodes, &payload.edges, center);
                Ok(serde_json::to_value(result)?)
            }
            OperationKind::BatchProcess if nested => Err(CareerTreeError::InvalidPayload {
                operation: kind.to_string(),
                details: "batchProcess cannot be nested inside another batch".to_string(),
            }
            .into()),
            OperationKind::BatchProcess => {
                let payload: BatchProcessData = parse_payload(kind, data)?;
                let mut results = Vec::with_capacity(payload.operations.len());
                for operation in payload.operations {
                    let body = match self.execute(&operation.operation, operation.data, true) {
                        Ok(result) => ReplyBody::Success { result },
                        Err(err) => ReplyBody::Error {
                            error: err.to_string(),
                        },
                    };
                    results.push(body);
                }
                Ok(serde_json::to_value(results)?)
            }
            OperationKind::ClearCache => {
                let layout_entries = self.layout_cache.len();
                let indexed_nodes = self.index.node_count();
                self.clear_caches();
                Ok(json!({
                    "cleared": true,
                    "layoutEntries": layout_entries,
                    "indexedNodes": indexed_nodes,
                }))
            }
            OperationKind::GetStats => Ok(serde_json::to_value(self.stats())?),
        }
    }
}

impl GraphViewPort for GraphViewSession {
    fn build_spatial_index(&mut self, nodes: &[Node], grid_size: f64) -> Result<IndexStats> {
        let stats = self.index.build(nodes, grid_size)?;
        debug!(
            cells = stats.cell_count,
            nodes = stats.node_count,
            grid_size,
            "Spatial index rebuilt"
        );
        Ok(stats)
    }

    fn cull_viewport(&self, bounds: Bounds, grid_size: f64) -> CullResult {
        ViewportCuller::cull(&self.index, bounds, grid_size)
    }

    fn calculate_layout(
        &mut self,
        nodes: &[Node],
        edges: &[Edge],
        center: Position,
    ) -> LayoutResult {
        self.engine
            .layout(&mut self.layout_cache, nodes, edges, center)
    }

    fn clear_caches(&mut self) {
        self.index.clear();
        self.layout_cache.clear();
    }

    fn stats(&self) -> SessionStats {
        SessionStats {
            indexed_nodes: self.index.node_count(),
            index_cells: self.index.cell_count(),
            grid_size: self.index.grid_size(),
            layout_cache_entries: self.layout_cache.len(),
            messages_handled: self.messages_handled,
            errors: self.errors,
        }
    }
}

fn parse_payload<T: DeserializeOwned>(kind: OperationKind, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        CareerTreeError::InvalidPayload {
            operation: kind.to_string(),
            details: e.to_string(),
        }
        .into()
    })
}
