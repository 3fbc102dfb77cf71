//! Platform jumper game
//!
//! The player hangs at a fixed horizontal position while platforms
//! scroll past underneath. Landing is a swept check against each
//! platform's top band; the ground line is lethal. Scroll speed ramps
//! up as platforms are retired.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::Body;
use super::engine::{GameEvent, GameRules};
use super::field::{Platform, PlatformField};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct JumperConfig {
    pub field: Vec2,
    pub seed: u64,
}

impl Default for JumperConfig {
    fn default() -> Self {
        Self {
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            seed: 0,
        }
    }
}

/// Latched input: `jump` is one-shot and only honored while grounded.
#[derive(Debug, Clone, Default)]
pub struct JumperInput {
    pub jump: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JumperSnapshot {
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    pub grounded: bool,
    pub platforms: Vec<Platform>,
    pub scroll: f32,
    pub score: u32,
    pub terminal: bool,
}

#[derive(Debug, Clone)]
pub struct JumperGame {
    config: JumperConfig,
    player: Body,
    field: PlatformField,
    grounded: bool,
    score: u32,
    alive: bool,
}

pub type JumperSession = super::engine::Session<JumperGame>;

impl JumperGame {
    pub fn new(config: JumperConfig) -> Self {
        let field = PlatformField::new(config.field, Pcg32::seed_from_u64(config.seed));
        // Start standing on the seeded platform
        let start = &field.platforms[0];
        let player = Body::new(
            Vec2::new(
                start.pos.x + start.width / 2.0 - JUMPER_SIZE / 2.0,
                start.top() - JUMPER_SIZE,
            ),
            Vec2::splat(JUMPER_SIZE),
        );
        Self {
            config,
            player,
            field,
            grounded: true,
            score: 0,
            alive: true,
        }
    }

    /// Landing: descending, vertical span swept across the platform's
    /// top band, horizontal spans overlapping. Snaps to the surface and
    /// restores jump eligibility.
    fn resolve_landing(&mut self, prev_bottom: f32) {
        if self.player.pos.y <= prev_bottom - self.player.size.y {
            // Not descending this tick
            return;
        }
        let bottom = self.player.bottom();
        for platform in &self.field.platforms {
            let crossed_top =
                prev_bottom <= platform.top() + PLATFORM_HEIGHT && bottom >= platform.top();
            let overlap_x =
                self.player.right() > platform.pos.x && self.player.left() < platform.right();
            if crossed_top && overlap_x {
                self.player.pos.y = platform.top() - self.player.size.y;
                self.player.vel.y = 0.0;
                self.grounded = true;
                return;
            }
        }
    }

    /// A grounded player stays grounded only while a platform is still
    /// under its feet; the field scrolls support away.
    fn recheck_support(&mut self) {
        if !self.grounded {
            return;
        }
        let bottom = self.player.bottom();
        let supported = self.field.platforms.iter().any(|p| {
            (bottom - p.top()).abs() <= PLATFORM_HEIGHT
                && self.player.right() > p.pos.x
                && self.player.left() < p.right()
        });
        if !supported {
            self.grounded = false;
        }
    }
}

impl GameRules for JumperGame {
    type Input = JumperInput;
    type Snapshot = JumperSnapshot;

    fn tick(&mut self, input: &mut JumperInput, events: &mut Vec<GameEvent>) {
        // Jump only from the ground; airborne taps are dropped
        if input.jump {
            input.jump = false;
            if self.grounded {
                self.player.vel.y = JUMP_IMPULSE;
                self.grounded = false;
            }
        }

        let prev_bottom = self.player.bottom();
        if self.grounded {
            // Standing: no integration, the support check below decides
            // whether the floor scrolled away
        } else {
            self.player.integrate(JUMPER_GRAVITY);
            self.resolve_landing(prev_bottom);
        }

        // Ground line is lethal
        if self.player.bottom() >= self.config.field.y {
            self.alive = false;
            return;
        }

        let retired = self.field.advance();
        for _ in 0..retired {
            self.score += 1;
            events.push(GameEvent::ObstaclePassed { total: self.score });
        }

        self.recheck_support();
    }

    fn snapshot(&self) -> JumperSnapshot {
        JumperSnapshot {
            player_pos: self.player.pos,
            player_vel: self.player.vel,
            grounded: self.grounded,
            platforms: self.field.platforms.clone(),
            scroll: self.field.scroll,
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

    fn game() -> JumperGame {
        JumperGame::new(JumperConfig::default())
    }

    #[test]
    fn test_starts_grounded_on_seed_platform() {
        let game = game();
        assert!(game.grounded);
        let platform = &game.field.platforms[0];
        assert_eq!(game.player.bottom(), platform.top());
    }

    #[test]
    fn test_jump_only_while_grounded() {
        let mut game = game();
        let mut events = Vec::new();

        let mut input = JumperInput { jump: true };
        game.tick(&mut input, &mut events);
        assert!(!game.grounded);
        let airborne_vel = game.player.vel.y;
        assert!(airborne_vel < 0.0);

        // Airborne jump is a no-op: velocity follows gravity only
        let mut input = JumperInput { jump: true };
        game.tick(&mut input, &mut events);
        assert_eq!(game.player.vel.y, airborne_vel + JUMPER_GRAVITY);
    }

    #[test]
    fn test_landing_zeroes_velocity_and_restores_jump() {
        let mut game = game();
        let platform = game.field.platforms[0].clone();
        // Drop the player from just above the platform
        game.grounded = false;
        game.player.pos = Vec2::new(
            platform.pos.x + 5.0,
            platform.top() - JUMPER_SIZE - 4.0,
        );
        game.player.vel = Vec2::new(0.0, 5.0);

        let mut input = JumperInput::default();
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);

        assert!(game.grounded);
        assert_eq!(game.player.vel.y, 0.0);
        // Snapped exactly onto the surface
        assert_eq!(game.player.bottom(), platform.top());
    }

    #[test]
    fn test_ground_line_is_terminal() {
        let mut game = game();
        game.grounded = false;
        game.player.pos.y = game.config.field.y - JUMPER_SIZE - 2.0;
        game.player.vel = Vec2::new(0.0, 6.0);

        let mut input = JumperInput::default();
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);
        assert!(game.is_terminal());
    }

    #[test]
    fn test_support_scrolls_away() {
        let mut game = game();
        assert!(game.grounded);

        // Without jumping, the starting platform eventually scrolls out
        // from under the player
        let mut input = JumperInput::default();
        let mut events = Vec::new();
        for _ in 0..600 {
            game.tick(&mut input, &mut events);
            if !game.grounded {
                break;
            }
        }
        assert!(!game.grounded);
    }

    #[test]
    fn test_retired_platforms_score_and_accelerate() {
        let mut game = game();
        let start_scroll = game.field.scroll;

        // Keep the player safely airborne high above the field so only
        // the field logic runs
        let mut input = JumperInput::default();
        let mut events = Vec::new();
        for _ in 0..800 {
            game.grounded = false;
            game.player.pos = Vec2::new(100.0, 50.0);
            game.player.vel = Vec2::ZERO;
            game.tick(&mut input, &mut events);
        }

        assert!(game.score() > 0);
        assert!(game.field.scroll > start_scroll);
        let passed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .count() as u32;
        assert_eq!(passed, game.score());
    }
}
