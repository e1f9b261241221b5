//! Axis-aligned box overlap with forgiving padding
//!
//! Sprites have transparent margins, so both boxes are shrunk by a padding
//! before testing. Touching edges count as overlapping.

use glam::Vec2;

/// Box given by its top-left corner and size (screen space, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Overlap test with `padding` pulled in on every side of both boxes
    pub fn overlaps(&self, other: &Aabb, padding: f32) -> bool {
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());
        a_max.x - padding >= b_min.x + padding
            && a_min.x + padding <= b_max.x - padding
            && a_max.y - padding >= b_min.y + padding
            && a_min.y + padding <= b_max.y - padding
    }
}
