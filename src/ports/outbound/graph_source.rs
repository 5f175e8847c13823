use crate::career_graph::domain::GraphDocument;
use crate::shared::Result;
use std::path::Path;

/// GraphSource port for loading a node/edge document
///
/// The document is the JSON shape produced by the recommendation API:
/// `{ "nodes": [...], "edges": [...] }`.
pub trait GraphSource {
    /// Reads and parses the graph stored at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or is not a regular file
    /// - The file is not valid graph JSON
    fn read_graph(&self, path: &Path) -> Result<GraphDocument>;
}
