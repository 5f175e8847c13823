pub mod bounds;
pub mod edge;
pub mod graph_document;
pub mod node;
pub mod tree_adjacency;

pub use bounds::Bounds;
pub use edge::Edge;
pub use graph_document::GraphDocument;
pub use node::{Node, NodeKind, Position};
pub use tree_adjacency::TreeAdjacency;
