use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts where rendered JSON (layouts, culling results,
/// recalculated graphs) ends up: stdout or a file.
pub trait OutputPresenter {
    /// Presents the serialized content to the output destination
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - The destination is a symlink or its parent directory is missing
    fn present(&self, content: &str) -> Result<()>;
}
