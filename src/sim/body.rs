//! Moving bodies and Euler integration
//!
//! A [`Body`] is any simulated entity with a position, a velocity and a
//! fixed size: the bird, the jumper, brick-breaker balls. Units are
//! field pixels and pixels per tick; integration matches the source
//! order exactly (position first, then gravity).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_velocity;
use crate::consts::MAX_BODY_SPEED;

/// A moving entity. Position is the top-left corner of its AABB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Advance one tick under constant gravity.
    ///
    /// Velocity is clamped before integration begins, then
    /// `pos += vel`, then `vel.y += gravity`. The position update uses
    /// the pre-gravity velocity.
    pub fn integrate(&mut self, gravity: f32) {
        self.vel = clamp_velocity(self.vel, MAX_BODY_SPEED);
        self.pos += self.vel;
        self.vel.y += gravity;
    }

    /// Move by a fraction of the current velocity (sub-stepping).
    /// Gravity is not applied here; the brick-breaker ball is ballistic.
    pub fn step_fraction(&mut self, fraction: f32) {
        self.pos += self.vel * fraction;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// AABB overlap against a rectangle given as top-left + size.
    pub fn overlaps(&self, pos: Vec2, size: Vec2) -> bool {
        crate::aabb_overlap(self.pos, self.size, pos, size)
    }
}
