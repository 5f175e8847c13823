mod layout_cache;
mod mock_recalculator;
mod radial_layout;
mod spatial_index;
mod viewport_culler;

pub use layout_cache::{LayoutCache, SignatureStrategy};
pub use mock_recalculator::{MockRecalculation, MockRecalculator};
pub use radial_layout::{LayoutResult, RadialLayoutEngine, RingGeometry};
pub use spatial_index::{CellKey, IndexStats, SpatialIndex, DEFAULT_GRID_SIZE};
pub use viewport_culler::{CullResult, ViewportCuller};

/// Milliseconds elapsed since `start`, as reported in operation statistics
pub(crate) fn elapsed_ms(start: std::time::Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
