use crate::career_graph::domain::{Bounds, Node, NodeKind, Position};

/// On-canvas size of a rendered node
///
/// Three fixed tiers: anchors are drawn largest, occupations next, every other
/// kind (skills included) uses the generic card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeFootprint {
    pub width: f64,
    pub height: f64,
}

impl NodeFootprint {
    pub const ANCHOR: NodeFootprint = NodeFootprint {
        width: 280.0,
        height: 140.0,
    };
    pub const OCCUPATION: NodeFootprint = NodeFootprint {
        width: 220.0,
        height: 110.0,
    };
    pub const GENERIC: NodeFootprint = NodeFootprint {
        width: 180.0,
        height: 90.0,
    };

    /// Selects the footprint tier for a node
    ///
    /// Priority:
    /// 1. Anchor flag
    /// 2. Occupation kind
    /// 3. Generic
    pub fn for_node(node: &Node) -> Self {
        if node.is_anchor {
            return Self::ANCHOR;
        }
        match node.kind {
            NodeKind::Occupation => Self::OCCUPATION,
            _ => Self::GENERIC,
        }
    }

    /// Largest tier; bounds how far a box can reach beyond its center cell
    pub fn largest() -> Self {
        Self::ANCHOR
    }

    /// Box of this footprint centered on `center`
    pub fn bounds_at(&self, center: Position) -> Bounds {
        Bounds::centered_on(center, self.width, self.height)
    }
}
