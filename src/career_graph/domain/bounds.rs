use super::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Axis-aligned rectangle in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rectangle of `width` x `height` centered on `center`
    pub fn centered_on(center: Position, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::new(
            center.x - half_width,
            center.x + half_width,
            center.y - half_height,
            center.y + half_height,
        )
    }

    /// Same rectangle with `left <= right` and `top <= bottom`
    pub fn normalized(&self) -> Self {
        Self::new(
            self.left.min(self.right),
            self.left.max(self.right),
            self.top.min(self.bottom),
            self.top.max(self.bottom),
        )
    }

    /// Grows the rectangle by `dx` on both horizontal sides and `dy` on both vertical sides
    pub fn expanded(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.left - dx,
            self.right + dx,
            self.top - dy,
            self.bottom + dy,
        )
    }

    /// Inclusive overlap test; rectangles that only touch intersect
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.top <= other.bottom
            && self.bottom >= other.top
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
            && self.bottom.is_finite()
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }
}

/// Parses `left,right,top,bottom`
impl FromStr for Bounds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid bounds '{}': {}", s, e))?;

        match values.as_slice() {
            [left, right, top, bottom] => {
                let bounds = Bounds::new(*left, *right, *top, *bottom);
                if !bounds.is_finite() {
                    return Err(format!("Invalid bounds '{}': values must be finite", s));
                }
                Ok(bounds)
            }
            _ => Err(format!(
                "Invalid bounds '{}'. Expected four comma-separated numbers: left,right,top,bottom",
                s
            )),
        }
    }
}
