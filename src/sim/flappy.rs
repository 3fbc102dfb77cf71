//! Obstacle-avoidance game (tap to flap)
//!
//! One body under gravity, scrolling pipe columns with a fixed-height
//! gap. The session ends the tick the bird leaves the vertical play
//! range or overlaps a pipe outside its gap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::Body;
use super::engine::{GameEvent, GameRules};
use super::field::{Pipe, PipeField};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct FlappyConfig {
    pub field: Vec2,
    pub seed: u64,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            seed: 0,
        }
    }
}

/// Latched input: `flap` is one-shot, cleared by the tick that uses it.
#[derive(Debug, Clone, Default)]
pub struct FlappyInput {
    pub flap: bool,
}

/// Read-only view for the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct FlappySnapshot {
    pub bird_pos: Vec2,
    pub bird_vel: Vec2,
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub terminal: bool,
}

#[derive(Debug, Clone)]
pub struct FlappyGame {
    config: FlappyConfig,
    bird: Body,
    field: PipeField,
    score: u32,
    alive: bool,
}

pub type FlappySession = super::engine::Session<FlappyGame>;

impl FlappyGame {
    pub fn new(config: FlappyConfig) -> Self {
        let bird = Body::new(
            Vec2::new(config.field.x * 0.25, config.field.y * 0.4),
            Vec2::splat(BIRD_SIZE),
        );
        let field = PipeField::new(config.field, Pcg32::seed_from_u64(config.seed));
        Self {
            config,
            bird,
            field,
            score: 0,
            alive: true,
        }
    }

    /// Loss conditions: vertical span leaves [0, field_h - bird_h], or
    /// the bird horizontally overlaps a pipe column without its whole
    /// span inside the gap. First matching pipe ends the game.
    fn check_collisions(&mut self) {
        let max_y = self.config.field.y - self.bird.size.y;
        if self.bird.pos.y < 0.0 || self.bird.pos.y > max_y {
            self.alive = false;
            return;
        }

        for pipe in &self.field.pipes {
            let in_column =
                self.bird.right() > pipe.x && self.bird.left() < pipe.x + PIPE_WIDTH;
            if !in_column {
                continue;
            }
            let inside_gap =
                self.bird.top() >= pipe.gap_y && self.bird.bottom() <= pipe.gap_bottom();
            if !inside_gap {
                self.alive = false;
                return;
            }
        }
    }
}

impl GameRules for FlappyGame {
    type Input = FlappyInput;
    type Snapshot = FlappySnapshot;

    fn tick(&mut self, input: &mut FlappyInput, events: &mut Vec<GameEvent>) {
        if input.flap {
            input.flap = false;
            self.bird.vel.y = FLAP_IMPULSE;
        }

        self.bird.integrate(FLAPPY_GRAVITY);
        self.check_collisions();
        if !self.alive {
            return;
        }

        // Scroll the field; each retired pipe is a passed obstacle
        let retired = self.field.advance();
        for _ in 0..retired {
            self.score += 1;
            events.push(GameEvent::ObstaclePassed { total: self.score });
        }
    }

    fn snapshot(&self) -> FlappySnapshot {
        FlappySnapshot {
            bird_pos: self.bird.pos,
            bird_vel: self.bird.vel,
            pipes: self.field.pipes.clone(),
            score: self.score,
            terminal: !self.alive,
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_terminal(&self) -> bool {
        !self.alive
    }

    fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> FlappyGame {
        FlappyGame::new(FlappyConfig::default())
    }

    fn drive(game: &mut FlappyGame, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut input = FlappyInput::default();
        for _ in 0..ticks {
            if game.is_terminal() {
                break;
            }
            game.tick(&mut input, &mut events);
        }
        events
    }

    #[test]
    fn test_falls_to_floor_and_dies_same_tick() {
        let mut game = game();
        // No flapping: gravity wins eventually
        let _ = drive(&mut game, 500);
        assert!(game.is_terminal());
        // The bird was never allowed to keep moving past the boundary
        // for an extra tick
        assert!(game.bird.pos.y > game.config.field.y - BIRD_SIZE - MAX_BODY_SPEED * 2.0);
    }

    #[test]
    fn test_flap_is_consumed_once() {
        let mut game = game();
        let mut input = FlappyInput { flap: true };
        let mut events = Vec::new();

        game.tick(&mut input, &mut events);
        assert!(!input.flap);
        assert_eq!(game.bird.vel.y, FLAP_IMPULSE + FLAPPY_GRAVITY);
    }

    #[test]
    fn test_pipe_hit_outside_gap_kills() {
        let mut game = game();
        let pipe = game.field.pipes[0].clone();
        // Park the bird inside the pipe column, above the gap
        game.bird.pos = Vec2::new(pipe.x + 5.0, pipe.gap_y - BIRD_SIZE - 5.0);
        game.bird.vel = Vec2::ZERO;

        let mut input = FlappyInput::default();
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);
        assert!(game.is_terminal());
    }

    #[test]
    fn test_inside_gap_survives() {
        let mut game = game();
        let pipe = game.field.pipes[0].clone();
        game.bird.pos = Vec2::new(pipe.x + 5.0, pipe.gap_y + (PIPE_GAP - BIRD_SIZE) / 2.0);
        game.bird.vel = Vec2::ZERO;

        let mut input = FlappyInput::default();
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_score_increments_per_retired_pipe() {
        let mut game = game();
        // Teleport the bird into whatever gap is in front of it each
        // tick, so the run only ends if scoring logic is broken
        let mut input = FlappyInput::default();
        let mut events = Vec::new();
        for _ in 0..2000 {
            let y = game
                .field
                .pipes
                .iter()
                .find(|p| 40.0 > p.x && 10.0 < p.x + PIPE_WIDTH)
                .map(|p| p.gap_y + (PIPE_GAP - BIRD_SIZE) / 2.0)
                .unwrap_or(FIELD_HEIGHT * 0.5);
            game.bird.pos = Vec2::new(10.0, y);
            game.bird.vel = Vec2::ZERO;
            game.tick(&mut input, &mut events);
            assert!(!game.is_terminal());
        }

        let passed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .count() as u32;
        assert!(passed > 0);
        assert_eq!(game.score(), passed);
    }
}
