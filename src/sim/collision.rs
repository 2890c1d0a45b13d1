//! Axis-aligned bounding boxes over the percent-coordinate field
//!
//! Percent coordinates are projected into pixel space against the measured
//! field size at the moment of the check; boxes never outlive a single tick.

use glam::Vec2;

use super::state::{FieldSize, Hazard, PowerUp};
use crate::consts::*;

/// Pixel-space axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap - touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Player box: centered on its x percent, fixed square, inset from the bottom
pub fn player_box(x_percent: f32, field: FieldSize) -> Aabb {
    let cx = x_percent / 100.0 * field.width;
    let bottom = field.height - PLAYER_BOTTOM_INSET;
    Aabb::new(
        Vec2::new(cx - PLAYER_WIDTH / 2.0, bottom - PLAYER_WIDTH),
        Vec2::new(cx + PLAYER_WIDTH / 2.0, bottom),
    )
}

/// Hazard box: top-left anchored at its percent position, square at its size
pub fn hazard_box(hazard: &Hazard, field: FieldSize) -> Aabb {
    let min = Vec2::new(
        hazard.pos.x / 100.0 * field.width,
        hazard.pos.y / 100.0 * field.height,
    );
    Aabb::new(min, min + Vec2::splat(hazard.size))
}

/// Power-up box: top-left anchored, fixed sprite size
pub fn power_up_box(power_up: &PowerUp, field: FieldSize) -> Aabb {
    let min = Vec2::new(
        power_up.pos.x / 100.0 * field.width,
        power_up.pos.y / 100.0 * field.height,
    );
    Aabb::new(min, min + Vec2::splat(POWERUP_SIZE))
}
