use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the confidence score inside a node's data payload
pub const CONFIDENCE_KEY: &str = "confidence";

/// Center point of a node on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from this one, at `angle` radians (0 = +x, clockwise on screen)
    pub fn offset_polar(&self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Category tag of a node, serialized as the React Flow `type` string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Occupation,
    Skill,
    #[default]
    Generic,
    /// Any other tag; laid out and culled like a generic node
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Occupation => "occupation",
            NodeKind::Skill => "skill",
            NodeKind::Generic => "default",
            NodeKind::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "occupation" => NodeKind::Occupation,
            "skill" => NodeKind::Skill,
            "default" | "generic" | "" => NodeKind::Generic,
            _ => NodeKind::Other(tag),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

fn default_visible() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of the career tree
///
/// Built from an API response or a previous layout pass. Only the layout
/// engine rewrites `position`; culling filters without mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_anchor: bool,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            visible: true,
            is_anchor: false,
            kind,
            data: Map::new(),
        }
    }

    /// Creates an anchor node (a root such as the user's current occupation)
    pub fn anchor(id: impl Into<String>) -> Self {
        let mut node = Self::new(id, NodeKind::Occupation);
        node.is_anchor = true;
        node
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Copy of this node moved to `position`
    pub fn placed_at(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.data.get(CONFIDENCE_KEY).and_then(Value::as_f64)
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.data
            .insert(CONFIDENCE_KEY.to_string(), Value::from(confidence));
    }
}
