/// Mock implementations for testing
mod mock_progress_reporter;
mod mock_recalculation_api;

pub use mock_progress_reporter::{MockProgressReporter, Reported};
pub use mock_recalculation_api::MockRecalculationApi;
