//! Rectangle label record.

use serde::{Deserialize, Serialize};

/// A named axis-aligned rectangle in normalized `[0, 1]` image coordinates.
///
/// Only the bounds are stored; `center` and `size` are derived on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleLabel {
    /// Class name of the label
    pub name: String,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl RectangleLabel {
    /// Create a label from explicit bounds.
    pub fn new(name: &str, min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            name: name.to_string(),
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Create a label from two opposite corners in any order, as produced by
    /// a press/release drag.
    pub fn from_corners(name: &str, first: (f32, f32), second: (f32, f32)) -> Self {
        Self {
            name: name.to_string(),
            min_x: first.0.min(second.0),
            max_x: first.0.max(second.0),
            min_y: first.1.min(second.1),
            max_y: first.1.max(second.1),
        }
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Absolute width and height.
    pub fn size(&self) -> (f32, f32) {
        (
            (self.max_x - self.min_x).abs(),
            (self.max_y - self.min_y).abs(),
        )
    }
}
