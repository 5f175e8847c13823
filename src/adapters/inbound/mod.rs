/// Inbound adapters - drive the application from external input
mod json_lines;

pub use json_lines::{serve_json_lines, JsonLinesSummary};
