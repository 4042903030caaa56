//! Axis-aligned bounding box collision
//!
//! Everything in the playfield is an upright rectangle, so overlap is a
//! four-comparison test. Edges that merely touch do not count as a hit.

use glam::Vec2;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}
