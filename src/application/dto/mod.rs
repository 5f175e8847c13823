/// Data Transfer Objects for the application layer
///
/// DTOs carry requests and responses across the worker boundary and
/// between the CLI and the use cases.
mod recalculation;
mod render;
mod worker_protocol;

pub use recalculation::{
    RecalculationOptions, RecalculationParameters, RecalculationPriority, RecalculationRequest,
    RecalculationResponse,
};
pub use render::{RenderRequest, RenderResponse};
pub use worker_protocol::{
    BatchOperation, BatchProcessData, BuildIndexData, CalculateLayoutData, CullViewportData,
    OperationKind, ReplyBody, SessionStats, WorkerMessage, WorkerReply,
};
