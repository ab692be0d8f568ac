//! Axis-aligned rectangles

use serde::{Deserialize, Serialize};

/// Loose rectangle description
///
/// Explicit edges win when present and non-zero; otherwise the edge is
/// computed from the centre and size. A zero edge is treated as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectangleDesc {
    /// Centre x
    pub x: f32,
    /// Centre y
    pub y: f32,
    /// Full width
    pub width: f32,
    /// Full height
    pub height: f32,
    /// Explicit left edge
    pub x_min: Option<f32>,
    /// Explicit right edge
    pub x_max: Option<f32>,
    /// Explicit bottom edge
    pub y_min: Option<f32>,
    /// Explicit top edge
    pub y_max: Option<f32>,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Bottom edge
    pub y_min: f32,
    /// Top edge
    pub y_max: f32,
}

fn edge_or(explicit: Option<f32>, computed: f32) -> f32 {
    match explicit {
        Some(value) if value != 0.0 => value,
        _ => computed,
    }
}

impl Rectangle {
    /// Create from explicit edges
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    /// Create a rectangle centred on `(x, y)`
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x - width / 2.0, x + width / 2.0, y - height / 2.0, y + height / 2.0)
    }

    /// Create from a loose description
    pub fn from_desc(desc: &RectangleDesc) -> Self {
        let centered = Self::from_center(desc.x, desc.y, desc.width, desc.height);
        Self {
            x_min: edge_or(desc.x_min, centered.x_min),
            x_max: edge_or(desc.x_max, centered.x_max),
            y_min: edge_or(desc.y_min, centered.y_min),
            y_max: edge_or(desc.y_max, centered.y_max),
        }
    }

    /// Strict overlap test; shared edges do not count
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.x_max <= other.x_min
            || self.x_min >= other.x_max
            || self.y_max <= other.y_min
            || self.y_min >= other.y_max)
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Point test, inclusive on the min edges and exclusive on the max edges
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }
}

impl From<RectangleDesc> for Rectangle {
    fn from(desc: RectangleDesc) -> Self {
        Self::from_desc(&desc)
    }
}
