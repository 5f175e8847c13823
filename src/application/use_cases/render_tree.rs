use crate::application::dto::{
    BatchOperation, BatchProcessData, BuildIndexData, CalculateLayoutData, CullViewportData,
    OperationKind, RenderRequest, RenderResponse, ReplyBody, WorkerMessage,
};
use crate::career_graph::services::{CullResult, IndexStats, LayoutResult};
use crate::ports::outbound::{LayoutWorkerPort, ProgressReporter};
use crate::shared::Result;
use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// RenderTreeUseCase - one frame of the career tree
///
/// Sends a single `batchProcess` to the layout worker: build the spatial
/// index, cull the viewport when bounds are given, then lay the graph out.
/// Any failed step fails the whole render, so callers keep the node set they
/// displayed last.
///
/// # Type Parameters
/// * `W` - LayoutWorkerPort implementation
/// * `PR` - ProgressReporter implementation
pub struct RenderTreeUseCase<W, PR> {
    worker: W,
    progress_reporter: PR,
}

impl<W, PR> RenderTreeUseCase<W, PR>
where
    W: LayoutWorkerPort,
    PR: ProgressReporter,
{
    pub fn new(worker: W, progress_reporter: PR) -> Self {
        Self {
            worker,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: RenderRequest) -> Result<RenderResponse> {
        let RenderRequest {
            graph,
            bounds,
            center,
            grid_size,
        } = request;

        self.progress_reporter.report(&format!(
            "🌳 Rendering career tree ({} nodes, {} edges)...",
            graph.node_count(),
            graph.edge_count()
        ));

        let mut operations = vec![BatchOperation::new(
            OperationKind::BuildSpatialIndex,
            serde_json::to_value(BuildIndexData {
                nodes: graph.nodes.clone(),
                grid_size,
            })?,
        )];
        if let Some(bounds) = bounds {
            operations.push(BatchOperation::new(
                OperationKind::CullViewport,
                serde_json::to_value(CullViewportData { bounds, grid_size })?,
            ));
        }
        operations.push(BatchOperation::new(
            OperationKind::CalculateLayout,
            serde_json::to_value(CalculateLayoutData {
                nodes: graph.nodes,
                edges: graph.edges,
                center_x: center.x,
                center_y: center.y,
            })?,
        ));
        let total = operations.len();

        let message = WorkerMessage::new(
            Uuid::new_v4().to_string(),
            OperationKind::BatchProcess,
            serde_json::to_value(BatchProcessData { operations })?,
        );
        let reply = self.worker.dispatch(message).await?;
        let result = match reply.body {
            ReplyBody::Success { result } => result,
            ReplyBody::Error { error } => {
                self.progress_reporter.report_error(&error);
                bail!("Layout worker rejected the render batch: {}", error);
            }
        };

        let outcomes: Vec<ReplyBody> =
            serde_json::from_value(result).context("Malformed batch reply from layout worker")?;
        if outcomes.len() != total {
            bail!(
                "Layout worker returned {} results for {} operations",
                outcomes.len(),
                total
            );
        }

        let mut outcomes = outcomes.into_iter();
        let index: IndexStats = self.take_step(&mut outcomes, 1, total, "Spatial index built")?;
        let visible: Option<CullResult> = match bounds {
            Some(_) => Some(self.take_step(&mut outcomes, 2, total, "Viewport culled")?),
            None => None,
        };
        let layout: LayoutResult =
            self.take_step(&mut outcomes, total, total, "Layout calculated")?;

        self.progress_reporter.report_completion(&format!(
            "✅ Positioned {} nodes{}{}",
            layout.nodes.len(),
            if layout.cached { " (cached layout)" } else { "" },
            visible
                .as_ref()
                .map(|cull| format!(", {} visible", cull.count))
                .unwrap_or_default()
        ));

        Ok(RenderResponse {
            index,
            layout,
            visible,
        })
    }

    fn take_step<T: DeserializeOwned>(
        &self,
        outcomes: &mut impl Iterator<Item = ReplyBody>,
        step: usize,
        total: usize,
        label: &str,
    ) -> Result<T> {
        let outcome = outcomes
            .next()
            .ok_or_else(|| anyhow!("Missing result for step {} ({})", step, label))?;
        match outcome {
            ReplyBody::Success { result } => {
                self.progress_reporter
                    .report_progress(step, total, Some(label));
                decode(result, label)
            }
            ReplyBody::Error { error } => {
                self.progress_reporter.report_error(&error);
                Err(anyhow!("Render step {} of {} failed: {}", step, total, error))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value, label: &str) -> Result<T> {
    serde_json::from_value(value).with_context(|| format!("Malformed result for '{}'", label))
}
