/// Adapters layer - Infrastructure implementations
///
/// Inbound adapters drive the core from external input; outbound adapters
/// implement the outbound ports over files, stderr, HTTP and a worker thread.
pub mod inbound;
pub mod outbound;
