mod node_footprint;

pub use node_footprint::NodeFootprint;
