use crate::career_graph::domain::GraphDocument;
use crate::ports::outbound::GraphSource;
use crate::shared::error::CareerTreeError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum graph file size (100 MB)
const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// FileSystemReader adapter for reading graph documents from disk
///
/// Implements the GraphSource port for JSON files shaped like
/// `{ "nodes": [...], "edges": [...] }`.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Safely read a file with security checks:
    /// - Reject symbolic links
    /// - Check file size limits
    /// - Validate file is a regular file
    fn safe_read_file(&self, path: &Path) -> Result<String> {
        let metadata = fs::symlink_metadata(path)
            .map_err(|e| anyhow::anyhow!("Failed to read graph file metadata: {}", e))?;

        if metadata.is_symlink() {
            anyhow::bail!(
                "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
                path.display()
            );
        }

        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }

        let file_size = metadata.len();
        if file_size > MAX_FILE_SIZE {
            anyhow::bail!(
                "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
                path.display(),
                file_size,
                MAX_FILE_SIZE
            );
        }

        fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read graph file: {}", e))
    }
}

impl GraphSource for FileSystemReader {
    fn read_graph(&self, path: &Path) -> Result<GraphDocument> {
        if !path.exists() {
            return Err(CareerTreeError::GraphFileNotFound {
                path: path.to_path_buf(),
                suggestion: "Pass an existing JSON file with the --input option".to_string(),
            }
            .into());
        }

        let content = self.safe_read_file(path).map_err(|e| CareerTreeError::GraphParseError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| {
            CareerTreeError::GraphParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
