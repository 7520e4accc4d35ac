//! Grid snapping for block positions.

use kurbo::Point;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the snap changed the X coordinate.
    pub moved_x: bool,
    /// Whether the snap changed the Y coordinate.
    pub moved_y: bool,
}

impl SnapResult {
    /// Check if snapping moved the point at all.
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }
}

/// Round a single coordinate to the nearest multiple of `grid_size`, halves rounding up.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    (value / grid_size + 0.5).floor() * grid_size
}

/// Snap a point to the nearest grid intersection.
///
/// The grid starts at the world origin.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    let snapped = Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size));
    SnapResult {
        point: snapped,
        moved_x: snapped.x != point.x,
        moved_y: snapped.y != point.y,
    }
}
