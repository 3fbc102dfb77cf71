//! Power-up tokens and timed modifiers (brick breaker)
//!
//! Tokens drop from destroyed bricks, fall at constant speed and apply
//! a timed effect when the paddle catches them. Effects are expressed as
//! [`ModifierChange`] instructions so the game applies and reverts them
//! in one place. Timers are tick counters owned by [`ActiveModifiers`];
//! they cannot outlive the session that owns them.
//!
//! Stacking policy: one active modifier per category (paddle width, ball
//! speed). Re-applying the same kind resets the timer; applying the
//! opposite kind reverts the old effect first, then applies the new one.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{PADDLE_BASE_WIDTH, POWERUP_FALL_SPEED};

/// The five token types dropped by bricks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Expand,
    Shrink,
    Speed,
    Slow,
    Multi,
}

impl PowerUpKind {
    /// Uniform random draw over all five kinds.
    pub fn sample(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..5) {
            0 => PowerUpKind::Expand,
            1 => PowerUpKind::Shrink,
            2 => PowerUpKind::Speed,
            3 => PowerUpKind::Slow,
            _ => PowerUpKind::Multi,
        }
    }

    /// Effect duration in ticks at 50 Hz. Multi is permanent.
    pub fn duration_ticks(self) -> u32 {
        match self {
            PowerUpKind::Expand => 500, // 10 s
            PowerUpKind::Shrink => 400, // 8 s
            PowerUpKind::Speed => 350,  // 7 s
            PowerUpKind::Slow => 350,   // 7 s
            PowerUpKind::Multi => 0,
        }
    }

    /// Paddle width multiplier, for the width category.
    pub fn width_factor(self) -> Option<f32> {
        match self {
            PowerUpKind::Expand => Some(1.5),
            PowerUpKind::Shrink => Some(0.7),
            _ => None,
        }
    }

    /// Ball velocity multiplier, for the speed category.
    pub fn speed_factor(self) -> Option<f32> {
        match self {
            PowerUpKind::Speed => Some(1.3),
            PowerUpKind::Slow => Some(0.7),
            _ => None,
        }
    }
}

/// A falling token. Caught by the paddle or lost off the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self { kind, pos }
    }

    /// Constant-speed fall, one tick.
    pub fn fall(&mut self) {
        self.pos.y += POWERUP_FALL_SPEED;
    }
}

/// Instruction emitted when a modifier is applied or reverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierChange {
    /// Set the paddle width to this value
    PaddleWidth(f32),
    /// Multiply every ball velocity by this factor
    BallSpeedScale(f32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Slot {
    kind: PowerUpKind,
    ticks_left: u32,
}

/// Currently active timed effects: at most one per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveModifiers {
    width: Option<Slot>,
    speed: Option<Slot>,
}

impl ActiveModifiers {
    /// Apply a caught token, returning the changes to enact now.
    ///
    /// Multi is not a timed modifier and returns nothing; the caller
    /// spawns the extra balls itself.
    pub fn apply(&mut self, kind: PowerUpKind) -> Vec<ModifierChange> {
        let mut changes = Vec::new();

        if let Some(factor) = kind.width_factor() {
            // Width is absolute: reapplying or swapping just retargets
            // the width and resets the timer
            self.width = Some(Slot {
                kind,
                ticks_left: kind.duration_ticks(),
            });
            changes.push(ModifierChange::PaddleWidth(PADDLE_BASE_WIDTH * factor));
        }

        if let Some(factor) = kind.speed_factor() {
            // Speed is multiplicative: undo the previous factor before
            // applying the new one so effects never compound
            let undo = match self.speed.take() {
                Some(prev) => 1.0 / prev.kind.speed_factor().unwrap_or(1.0),
                None => 1.0,
            };
            self.speed = Some(Slot {
                kind,
                ticks_left: kind.duration_ticks(),
            });
            changes.push(ModifierChange::BallSpeedScale(undo * factor));
        }

        changes
    }

    /// Count down one tick, returning reversions for expired effects.
    pub fn tick(&mut self) -> Vec<ModifierChange> {
        let mut changes = Vec::new();

        if let Some(slot) = &mut self.width {
            slot.ticks_left -= 1;
            if slot.ticks_left == 0 {
                // Reverts to the base constant, not the pre-effect width
                self.width = None;
                changes.push(ModifierChange::PaddleWidth(PADDLE_BASE_WIDTH));
            }
        }

        if let Some(slot) = &mut self.speed {
            slot.ticks_left -= 1;
            if slot.ticks_left == 0 {
                let factor = slot.kind.speed_factor().unwrap_or(1.0);
                self.speed = None;
                changes.push(ModifierChange::BallSpeedScale(1.0 / factor));
            }
        }

        changes
    }

    pub fn is_idle(&self) -> bool {
        self.width.is_none() && self.speed.is_none()
    }
}
