//! Petcade - arcade mini-game simulation core
//!
//! Headless game logic for the three arcade machines in the pixel-pet app:
//! - `sim::flappy`: obstacle-avoidance (tap to flap, dodge the pipes)
//! - `sim::jumper`: platform jumper (scrolling platforms, one jump at a time)
//! - `sim::breaker`: brick breaker (paddle, bricks, power-ups, multi-ball)
//!
//! The crate owns physics, collisions, field generation, scoring and
//! win/loss evaluation. Rendering, touch capture and the coin wallet live
//! in the presentation layer, which drives a [`sim::Session`] and consumes
//! snapshots and events.

pub mod sim;

pub use sim::{GameEvent, Session};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz, the cadence of the mobile game loop)
    pub const TICK_SECONDS: f32 = 0.02;
    /// Maximum fixed steps drained per advance() to prevent spiral of death
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Per-component velocity clamp, pixels per tick
    pub const MAX_BODY_SPEED: f32 = 7.0;
    /// Sub-steps per tick for brick-breaker balls (anti-tunneling)
    pub const BALL_SUBSTEPS: u32 = 8;

    /// Default portrait playfield
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    // Flappy
    pub const BIRD_SIZE: f32 = 30.0;
    pub const FLAPPY_GRAVITY: f32 = 0.5;
    pub const FLAP_IMPULSE: f32 = -6.5;
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Minimum horizontal distance between consecutive pipes
    pub const PIPE_SPACING: f32 = 220.0;
    pub const PIPE_SCROLL_SPEED: f32 = 3.0;
    /// Gap never starts closer than this to the top/bottom edge
    pub const PIPE_GAP_MARGIN: f32 = 60.0;

    // Platform jumper
    pub const JUMPER_SIZE: f32 = 28.0;
    pub const JUMPER_GRAVITY: f32 = 0.55;
    pub const JUMP_IMPULSE: f32 = -7.0;
    pub const PLATFORM_HEIGHT: f32 = 14.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 50.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 150.0;
    /// Active platforms are topped up to this count
    pub const PLATFORM_CAP: usize = 5;
    pub const PLATFORM_SPACING: f32 = 180.0;
    pub const PLATFORM_BASE_SCROLL: f32 = 2.5;
    /// Scroll speeds up by this much per retired platform
    pub const PLATFORM_SPEEDUP: f32 = 0.1;
    pub const MOVING_PLATFORM_CHANCE: f64 = 0.3;
    /// Extra scroll speed for platforms flagged as moving
    pub const MOVING_PLATFORM_BONUS: f32 = 1.5;

    // Brick breaker
    pub const BALL_SIZE: f32 = 12.0;
    pub const BALL_START_SPEED: f32 = 5.0;
    pub const PADDLE_BASE_WIDTH: f32 = 90.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Paddle top sits this far above the bottom edge
    pub const PADDLE_MARGIN: f32 = 40.0;
    /// Maximum rebound angle off the paddle, measured from vertical
    pub const PADDLE_MAX_BOUNCE: f32 = std::f32::consts::FRAC_PI_3;
    pub const BRICK_HEIGHT: f32 = 22.0;
    pub const BRICK_TOP_OFFSET: f32 = 60.0;
    /// Chance a destroyed brick drops a power-up token
    pub const POWERUP_DROP_CHANCE: f64 = 0.2;
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.5;
}

/// Axis-aligned overlap test between two rectangles given by
/// top-left corner and size.
#[inline]
pub fn aabb_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_a.x + size_a.x > pos_b.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_a.y + size_a.y > pos_b.y
}

/// Clamp each velocity component to [-max, max]
#[inline]
pub fn clamp_velocity(vel: Vec2, max: f32) -> Vec2 {
    Vec2::new(vel.x.clamp(-max, max), vel.y.clamp(-max, max))
}
