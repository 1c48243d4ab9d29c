//! World-space geometry: axis-aligned rectangles and vector helpers.
//!
//! World units are pixels; the y axis grows downward (screen space).

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Heading used when a direction vector degenerates to zero length.
pub const DEFAULT_HEADING: Vec2 = Vec2::new(0.0, 1.0);

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl Rect {
    /// Creates a new rectangle from its corners.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Creates a rectangle of the given full size centered on a point.
    #[must_use]
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Returns the center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Checks if this rectangle overlaps another.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Checks if a point lies inside the rectangle (inclusive of the min edge).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x && point.x < self.max_x && point.y >= self.min_y && point.y < self.max_y
    }

    /// Returns the rectangle translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns true if every coordinate is finite and the extent is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.max_x >= self.min_x
            && self.max_y >= self.min_y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Normalizes a vector, falling back to [`DEFAULT_HEADING`] for zero or
/// non-finite input.
#[must_use]
pub fn unit_or_default(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(DEFAULT_HEADING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_center() {
        let r = Rect::from_center(Vec2::new(10.0, 10.0), 4.0, 6.0);
        assert_eq!(r, Rect::new(8.0, 7.0, 12.0, 13.0));
        assert_eq!(r.center(), Vec2::new(10.0, 10.0));
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 6.0);
    }

    #[test]
    fn test_rect_translated() {
        let r = Rect::from_xywh(0.0, 0.0, 2.0, 2.0).translated(Vec2::new(3.0, -1.0));
        assert_eq!(r, Rect::new(3.0, -1.0, 5.0, 1.0));
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.9, 9.9)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::from_xywh(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(5.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn test_unit_or_default() {
        assert_eq!(unit_or_default(Vec2::ZERO), DEFAULT_HEADING);
        let u = unit_or_default(Vec2::new(3.0, 4.0));
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!((u.x - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-5);
    }
}
