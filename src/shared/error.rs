use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow scripts to distinguish between authoritative results,
/// degraded (mock) results and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - authoritative result produced
    Success = 0,
    /// The remote endpoint was missing and a local mock result was produced instead
    DegradedResult = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (API error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::DegradedResult => write!(f, "Degraded Result (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for graph loading, layout and the worker protocol.
#[derive(Debug, Error)]
pub enum CareerTreeError {
    #[error("Graph file not found: {path}\n\n💡 Hint: {suggestion}")]
    GraphFileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse graph file: {path}\nDetails: {details}\n\n💡 Hint: The file must be a JSON object with \"nodes\" and \"edges\" arrays")]
    GraphParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Unknown worker operation: {name}\n\n💡 Hint: Supported operations are buildSpatialIndex, cullViewport, calculateLayout, batchProcess, clearCache and getStats")]
    UnknownOperation { name: String },

    #[error("Invalid payload for {operation}: {details}")]
    InvalidPayload { operation: String, details: String },

    #[error("Invalid grid size: {grid_size}\n\n💡 Hint: The grid size must be a positive, finite number")]
    InvalidGridSize { grid_size: f64 },

    #[error("Layout worker is not running")]
    WorkerUnavailable,

    /// Validation error for configuration and request builders
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Failures of a recommendation graph recalculation.
///
/// `Clone` so that every caller coalesced onto one in-flight request receives
/// the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecalculationError {
    #[error("Recalculation was cancelled")]
    Cancelled,

    #[error("Recalculation was superseded by a newer request with the same debounce key")]
    Superseded,

    #[error("Recalculation endpoint not found: {url}")]
    EndpointNotFound { url: String },

    #[error("Recalculation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Recalculation API returned status code {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error during recalculation: {details}")]
    Network { details: String },

    #[error("Invalid recalculation response: {details}")]
    InvalidResponse { details: String },
}

impl RecalculationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RecalculationError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::DegradedResult.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::DegradedResult),
            "Degraded Result (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_graph_file_not_found_display() {
        let error = CareerTreeError::GraphFileNotFound {
            path: PathBuf::from("/test/graph.json"),
            suggestion: "Pass the graph with --input".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Graph file not found"));
        assert!(display.contains("/test/graph.json"));
        assert!(display.contains("💡 Hint:"));
        assert!(display.contains("--input"));
    }

    #[test]
    fn test_graph_parse_error_display() {
        let error = CareerTreeError::GraphParseError {
            path: PathBuf::from("/test/graph.json"),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to parse graph file"));
        assert!(display.contains("expected value at line 1"));
    }

    #[test]
    fn test_unknown_operation_display() {
        let error = CareerTreeError::UnknownOperation {
            name: "explode".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("explode"));
        assert!(display.contains("buildSpatialIndex"));
    }

    #[test]
    fn test_invalid_grid_size_display() {
        let error = CareerTreeError::InvalidGridSize { grid_size: -5.0 };
        assert!(format!("{}", error).contains("-5"));
    }

    #[test]
    fn test_recalculation_error_cancelled_is_distinct() {
        assert!(RecalculationError::Cancelled.is_cancelled());
        assert!(!RecalculationError::Network {
            details: "connection refused".to_string()
        }
        .is_cancelled());
        assert_eq!(
            RecalculationError::Cancelled.to_string(),
            "Recalculation was cancelled"
        );
    }

    #[test]
    fn test_recalculation_error_http_display() {
        let error = RecalculationError::Http {
            status: 503,
            message: "maintenance".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("503"));
        assert!(display.contains("maintenance"));
    }

    #[test]
    fn test_recalculation_error_clone_equality() {
        let error = RecalculationError::Timeout {
            timeout: Duration::from_secs(30),
        };
        assert_eq!(error.clone(), error);
        assert_eq!(error.to_string(), "Recalculation timed out after 30s");
    }
}
