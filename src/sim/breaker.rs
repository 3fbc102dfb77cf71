//! Brick breaker game
//!
//! Balls are ballistic (no gravity) and integrate in sub-steps, each
//! sub-step collision-checked, so paddle and brick hits stay robust at
//! the velocity clamp. Paddle collision is swept across sub-steps; the
//! rebound angle comes from the contact offset. Destroyed bricks score
//! the current level and may drop a power-up token.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::Body;
use super::engine::{GameEvent, GameRules};
use super::field::BrickGrid;
use super::powerup::{ActiveModifiers, ModifierChange, PowerUp, PowerUpKind};
use crate::clamp_velocity;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub field: Vec2,
    pub rows: usize,
    pub cols: usize,
    pub level: u32,
    pub seed: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            rows: 6,
            cols: 10,
            level: 1,
            seed: 0,
        }
    }
}

/// Latched input: the paddle target persists until replaced, and any
/// value is accepted (clamped on consumption).
#[derive(Debug, Clone, Default)]
pub struct BreakerInput {
    pub paddle_x: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddleView {
    /// Center x
    pub x: f32,
    pub width: f32,
    /// Top edge y
    pub top: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub balls: Vec<Body>,
    pub paddle: PaddleView,
    pub rows: usize,
    pub cols: usize,
    /// Alive flags, row-major
    pub bricks: Vec<bool>,
    pub powerups: Vec<PowerUp>,
    pub score: u32,
    pub level: u32,
    pub terminal: bool,
}

/// Rebound velocity off the paddle. `offset` is the contact point's
/// distance from the paddle center, normalized to [-1, 1]; the rebound
/// angle maps linearly to [-60°, +60°] from vertical and the speed
/// magnitude is preserved.
pub fn paddle_rebound(offset: f32, speed: f32) -> Vec2 {
    let angle = offset.clamp(-1.0, 1.0) * PADDLE_MAX_BOUNCE;
    Vec2::new(speed * angle.sin(), -speed * angle.cos().abs())
}

#[derive(Debug, Clone)]
struct Paddle {
    /// Center x
    x: f32,
    width: f32,
}

#[derive(Debug, Clone)]
pub struct BreakerGame {
    config: BreakerConfig,
    rng: Pcg32,
    balls: Vec<Body>,
    paddle: Paddle,
    grid: BrickGrid,
    powerups: Vec<PowerUp>,
    modifiers: ActiveModifiers,
    level: u32,
    score: u32,
}

pub type BreakerSession = super::engine::Session<BreakerGame>;

impl BreakerGame {
    pub fn new(config: BreakerConfig) -> Self {
        let grid = BrickGrid::new(config.rows, config.cols, config.field.x);
        let paddle = Paddle {
            x: config.field.x / 2.0,
            width: PADDLE_BASE_WIDTH,
        };
        let mut game = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            balls: Vec::new(),
            grid,
            powerups: Vec::new(),
            modifiers: ActiveModifiers::default(),
            level: config.level.max(1),
            score: 0,
            paddle,
            config,
        };
        game.balls.push(game.serve_ball());
        game
    }

    fn paddle_top(&self) -> f32 {
        self.config.field.y - PADDLE_MARGIN
    }

    /// Fresh ball above the paddle, launched at a 3-4-5 angle.
    fn serve_ball(&self) -> Body {
        let mut ball = Body::new(
            Vec2::new(
                self.paddle.x - BALL_SIZE / 2.0,
                self.paddle_top() - BALL_SIZE - 2.0,
            ),
            Vec2::splat(BALL_SIZE),
        );
        ball.vel = Vec2::new(BALL_START_SPEED * 0.6, -BALL_START_SPEED * 0.8);
        ball
    }

    fn paddle_left(&self) -> f32 {
        self.paddle.x - self.paddle.width / 2.0
    }

    fn paddle_right(&self) -> f32 {
        self.paddle.x + self.paddle.width / 2.0
    }

    fn apply_change(&mut self, change: ModifierChange) {
        match change {
            ModifierChange::PaddleWidth(width) => {
                self.paddle.width = width;
            }
            ModifierChange::BallSpeedScale(scale) => {
                for ball in &mut self.balls {
                    ball.vel = clamp_velocity(ball.vel * scale, MAX_BODY_SPEED);
                }
            }
        }
    }

    /// All bricks cleared: bank the win bonus and start the next level
    /// with a fresh grid of the same dimensions. Score and level carry
    /// over; tokens and timed effects do not.
    fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        let bonus = self.level * self.config.rows as u32;
        self.score += bonus;
        events.push(GameEvent::LevelCleared {
            level: self.level,
            bonus,
        });
        log::info!("level {} cleared, bonus {}", self.level, bonus);

        self.level += 1;
        self.grid = BrickGrid::new(self.config.rows, self.config.cols, self.config.field.x);
        self.powerups.clear();
        self.modifiers = ActiveModifiers::default();
        self.paddle.width = PADDLE_BASE_WIDTH;
        self.balls = vec![self.serve_ball()];
    }

    /// One collision-checked sub-step for the ball at `index`.
    fn substep(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let field = self.config.field;
        let paddle_top = self.paddle_top();
        let paddle_left = self.paddle_left();
        let paddle_right = self.paddle_right();
        let paddle_x = self.paddle.x;
        let paddle_half = self.paddle.width / 2.0;

        let ball = &mut self.balls[index];
        let prev = ball.pos;
        ball.step_fraction(1.0 / BALL_SUBSTEPS as f32);

        // Walls mirror velocity sign and clamp position in-bounds
        if ball.pos.x < 0.0 {
            ball.pos.x = 0.0;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.right() > field.x {
            ball.pos.x = field.x - ball.size.x;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y < 0.0 {
            ball.pos.y = 0.0;
            ball.vel.y = ball.vel.y.abs();
        }

        // Swept paddle collision: did the bottom edge cross the paddle's
        // top band between sub-steps, with horizontal overlap at either
        // endpoint? Catches overshoot a point-in-time test would miss.
        if ball.vel.y > 0.0 {
            let prev_bottom = prev.y + ball.size.y;
            let crossed = prev_bottom <= paddle_top + PADDLE_HEIGHT && ball.bottom() >= paddle_top;
            let overlap_at = |x: f32| x + ball.size.x > paddle_left && x < paddle_right;
            if crossed && (overlap_at(prev.x) || overlap_at(ball.pos.x)) {
                let center_x = ball.pos.x + ball.size.x / 2.0;
                let offset = (center_x - paddle_x) / paddle_half;
                let speed = ball.vel.length();
                ball.vel = paddle_rebound(offset, speed);
                ball.pos.y = paddle_top - ball.size.y;
                return;
            }
        }

        // Brick scan: row-major, first overlapping alive cell wins
        let hit = {
            let grid = &self.grid;
            let ball = &self.balls[index];
            grid.iter_alive().find(|&(row, col)| {
                let (pos, size) = grid.brick_rect(row, col);
                ball.overlaps(pos, size)
            })
        };
        if let Some((row, col)) = hit {
            let (brick_pos, brick_size) = self.grid.brick_rect(row, col);
            self.grid.destroy(row, col);
            self.score += self.level;
            events.push(GameEvent::BrickDestroyed {
                row,
                col,
                points: self.level,
            });

            if self.rng.random_bool(POWERUP_DROP_CHANCE) {
                let kind = PowerUpKind::sample(&mut self.rng);
                let center = brick_pos + brick_size * 0.5;
                self.powerups
                    .push(PowerUp::new(kind, center - Vec2::splat(POWERUP_SIZE / 2.0)));
                events.push(GameEvent::PowerUpSpawned { kind });
            }

            // Reflect along whichever axis has the larger center-to-center
            // offset between ball and brick
            let ball = &mut self.balls[index];
            let delta = ball.center() - (brick_pos + brick_size * 0.5);
            if delta.x.abs() > delta.y.abs() {
                ball.vel.x = if delta.x > 0.0 {
                    ball.vel.x.abs()
                } else {
                    -ball.vel.x.abs()
                };
            } else {
                ball.vel.y = if delta.y > 0.0 {
                    ball.vel.y.abs()
                } else {
                    -ball.vel.y.abs()
                };
            }
        }
    }

    fn update_powerups(&mut self, events: &mut Vec<GameEvent>) {
        let field_bottom = self.config.field.y;
        let paddle_rect_pos = Vec2::new(self.paddle_left(), self.paddle_top());
        let paddle_rect_size = Vec2::new(self.paddle.width, PADDLE_HEIGHT);

        let mut caught = Vec::new();
        self.powerups.retain_mut(|token| {
            token.fall();
            let token_size = Vec2::splat(POWERUP_SIZE);
            if crate::aabb_overlap(token.pos, token_size, paddle_rect_pos, paddle_rect_size) {
                caught.push(token.kind);
                false
            } else {
                // Off-field tokens vanish with no effect
                token.pos.y <= field_bottom
            }
        });

        for kind in caught {
            events.push(GameEvent::PowerUpCaught { kind });
            if kind == PowerUpKind::Multi {
                self.spawn_multi_balls();
            } else {
                for change in self.modifiers.apply(kind) {
                    self.apply_change(change);
                }
            }
        }
    }

    /// Two extra balls mirrored off the first ball's trajectory.
    /// Permanent: multi-ball has no timer and no reversion.
    fn spawn_multi_balls(&mut self) {
        let Some(source) = self.balls.first().cloned() else {
            return;
        };
        let mut horizontal = source.clone();
        horizontal.vel.x = -source.vel.x;
        let mut vertical = source.clone();
        vertical.vel.y = -source.vel.y;
        self.balls.push(horizontal);
        self.balls.push(vertical);
    }
}

impl GameRules for BreakerGame {
    type Input = BreakerInput;
    type Snapshot = BreakerSnapshot;

    fn tick(&mut self, input: &mut BreakerInput, events: &mut Vec<GameEvent>) {
        // Paddle tracks the latest touch position, clamped to the field
        if let Some(x) = input.paddle_x.take() {
            let half = self.paddle.width / 2.0;
            self.paddle.x = x.clamp(half, self.config.field.x - half);
        }

        // Sub-stepped integration, each sub-step collision checked
        for index in 0..self.balls.len() {
            self.balls[index].vel = clamp_velocity(self.balls[index].vel, MAX_BODY_SPEED);
            for _ in 0..BALL_SUBSTEPS {
                self.substep(index, events);
            }
        }

        // Balls fully below the field are lost; the session survives as
        // long as one remains
        let field_bottom = self.config.field.y;
        self.balls.retain(|ball| ball.top() <= field_bottom);
        if self.balls.is_empty() {
            return;
        }

        self.update_powerups(events);

        for change in self.modifiers.tick() {
            self.apply_change(change);
        }

        // A zero-dimension grid never "clears"
        if !self.grid.cells().is_empty() && self.grid.is_cleared() {
            self.advance_level(events);
        }
    }

    fn snapshot(&self) -> BreakerSnapshot {
        BreakerSnapshot {
            balls: self.balls.clone(),
            paddle: PaddleView {
                x: self.paddle.x,
                width: self.paddle.width,
                top: self.paddle_top(),
            },
            rows: self.grid.rows,
            cols: self.grid.cols,
            bricks: self.grid.cells().to_vec(),
            powerups: self.powerups.clone(),
            score: self.score,
            level: self.level,
            terminal: self.balls.is_empty(),
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_terminal(&self) -> bool {
        self.balls.is_empty()
    }

    /// Retry after loss: score and level reset to defaults.
    fn reset(&mut self) {
        let mut config = self.config.clone();
        config.level = 1;
        *self = Self::new(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn game() -> BreakerGame {
        BreakerGame::new(BreakerConfig::default())
    }

    fn tick(game: &mut BreakerGame) -> Vec<GameEvent> {
        let mut input = BreakerInput::default();
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);
        events
    }

    #[test]
    fn test_center_contact_rebounds_vertically() {
        let rebound = paddle_rebound(0.0, 5.0);
        assert_eq!(rebound.x, 0.0);
        assert_eq!(rebound.y, -5.0);
    }

    #[test]
    fn test_edge_contact_rebounds_at_max_angle() {
        let rebound = paddle_rebound(-1.0, 5.0);
        // -60 degrees from vertical, leftward
        assert!((rebound.x - (-5.0 * PADDLE_MAX_BOUNCE.sin())).abs() < 1e-4);
        assert!((rebound.y - (-5.0 * PADDLE_MAX_BOUNCE.cos())).abs() < 1e-4);
        // Speed preserved
        assert!((rebound.length() - 5.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_rebound_angle_monotonic_in_offset(
            a in -1.0f32..1.0,
            b in -1.0f32..1.0,
        ) {
            prop_assume!(b - a > 1e-3);
            let ra = paddle_rebound(a, 5.0);
            let rb = paddle_rebound(b, 5.0);
            prop_assert!(ra.x < rb.x);
            // Always rebounds upward
            prop_assert!(ra.y < 0.0 && rb.y < 0.0);
        }

        #[test]
        fn prop_rebound_preserves_speed(
            offset in -2.0f32..2.0,
            speed in 0.1f32..7.0,
        ) {
            let rebound = paddle_rebound(offset, speed);
            prop_assert!((rebound.length() - speed).abs() < 1e-3);
        }
    }

    #[test]
    fn test_paddle_swept_collision_no_tunnel() {
        let mut game = game();
        // Ball dropping at the clamp straight onto the paddle center
        game.balls[0].pos = Vec2::new(
            game.paddle.x - BALL_SIZE / 2.0,
            game.paddle_top() - BALL_SIZE - 1.0,
        );
        game.balls[0].vel = Vec2::new(0.0, MAX_BODY_SPEED);

        tick(&mut game);

        assert_eq!(game.balls.len(), 1);
        assert!(game.balls[0].vel.y < 0.0, "ball should have bounced");
        assert!(game.balls[0].bottom() <= game.paddle_top() + 1e-3);
    }

    #[test]
    fn test_wall_bounce_mirrors_and_clamps() {
        let mut game = game();
        // y = 400 is well below the brick rows, so only the wall matters
        game.balls[0].pos = Vec2::new(1.0, 400.0);
        game.balls[0].vel = Vec2::new(-6.0, 0.0);

        tick(&mut game);

        let ball = &game.balls[0];
        assert!(ball.vel.x > 0.0);
        assert!(ball.pos.x >= 0.0);
    }

    #[test]
    fn test_brick_hit_scores_level_and_reflects() {
        let mut game = game();
        let (brick_pos, brick_size) = game.grid.brick_rect(5, 4);
        // Approach the bottom row from below
        game.balls[0].pos = Vec2::new(
            brick_pos.x + brick_size.x / 2.0 - BALL_SIZE / 2.0,
            brick_pos.y + brick_size.y + 2.0,
        );
        game.balls[0].vel = Vec2::new(0.0, -4.0);

        let events = tick(&mut game);

        assert!(!game.grid.is_alive(5, 4));
        assert_eq!(game.score(), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::BrickDestroyed { row: 5, col: 4, points: 1 }
        )));
        // Reflected downward, away from the brick
        assert!(game.balls[0].vel.y > 0.0);
    }

    #[test]
    fn test_last_brick_completes_level() {
        let mut game = game();
        // Leave a single brick alive
        for (r, c) in (0..6).flat_map(|r| (0..10).map(move |c| (r, c))) {
            if (r, c) != (0, 0) {
                game.grid.destroy(r, c);
            }
        }
        assert_eq!(game.grid.alive_count(), 1);

        let (brick_pos, brick_size) = game.grid.brick_rect(0, 0);
        game.balls[0].pos = Vec2::new(
            brick_pos.x + brick_size.x / 2.0 - BALL_SIZE / 2.0,
            brick_pos.y + brick_size.y + 2.0,
        );
        game.balls[0].vel = Vec2::new(0.0, -4.0);

        let events = tick(&mut game);

        // 1 point for the brick plus level * rows bonus, then level 2
        // with a full fresh grid and no bricks left behind
        assert!(events.contains(&GameEvent::LevelCleared { level: 1, bonus: 6 }));
        assert_eq!(game.score(), 1 + 6);
        assert_eq!(game.level, 2);
        assert_eq!(game.grid.alive_count(), 60);
        assert!(game.powerups.is_empty());
        assert_eq!(game.paddle.width, PADDLE_BASE_WIDTH);
    }

    #[test]
    fn test_destroying_full_grid_scores_per_brick_plus_bonus() {
        let mut game = game();
        game.powerups.clear();

        // Feed the ball every brick in turn; each tick destroys at least
        // one cell it overlaps
        let mut guard = 0;
        while !game.grid.is_cleared() && game.level == 1 {
            let (row, col) = game.grid.iter_alive().next().unwrap();
            let (pos, size) = game.grid.brick_rect(row, col);
            game.balls[0].pos = pos + size * 0.5 - Vec2::splat(BALL_SIZE / 2.0);
            game.balls[0].vel = Vec2::new(0.1, 0.1);
            tick(&mut game);
            guard += 1;
            assert!(guard < 500, "grid never cleared");
        }

        // 60 bricks at level 1 plus the 1 * 6 win bonus
        assert_eq!(game.level, 2);
        assert_eq!(game.score(), 60 + 6);
    }

    #[test]
    fn test_multi_ball_yields_three_clamped_balls() {
        let mut game = game();
        assert_eq!(game.balls.len(), 1);

        // Drop a Multi token right onto the paddle
        game.powerups.push(PowerUp::new(
            PowerUpKind::Multi,
            Vec2::new(game.paddle.x, game.paddle_top() - POWERUP_FALL_SPEED),
        ));
        // Park the ball away from everything so only the token matters
        game.balls[0].pos = Vec2::new(200.0, 400.0);
        game.balls[0].vel = Vec2::new(3.0, -4.0);

        let events = tick(&mut game);

        assert_eq!(game.balls.len(), 3);
        assert!(events.contains(&GameEvent::PowerUpCaught {
            kind: PowerUpKind::Multi
        }));
        for ball in &game.balls {
            let clamped = clamp_velocity(ball.vel, MAX_BODY_SPEED);
            assert_eq!(ball.vel, clamped);
        }
    }

    #[test]
    fn test_lost_last_ball_is_terminal() {
        let mut game = game();
        game.balls[0].pos = Vec2::new(200.0, FIELD_HEIGHT + 100.0);
        game.balls[0].vel = Vec2::new(0.0, MAX_BODY_SPEED);

        tick(&mut game);
        assert!(game.is_terminal());
    }

    #[test]
    fn test_paddle_input_clamped() {
        let mut game = game();
        let mut input = BreakerInput {
            paddle_x: Some(-1000.0),
        };
        let mut events = Vec::new();
        game.tick(&mut input, &mut events);
        assert_eq!(game.paddle.x, game.paddle.width / 2.0);

        let mut input = BreakerInput {
            paddle_x: Some(1e9),
        };
        game.tick(&mut input, &mut events);
        assert_eq!(game.paddle.x, FIELD_WIDTH - game.paddle.width / 2.0);
    }

    #[test]
    fn test_caught_expand_widens_until_expiry() {
        let mut game = game();
        game.balls[0].pos = Vec2::new(200.0, 400.0);
        game.balls[0].vel = Vec2::new(3.0, -4.0);
        game.powerups.push(PowerUp::new(
            PowerUpKind::Expand,
            Vec2::new(game.paddle.x, game.paddle_top() - POWERUP_FALL_SPEED),
        ));

        tick(&mut game);
        assert_eq!(game.paddle.width, PADDLE_BASE_WIDTH * 1.5);

        // Keep the ball aloft until the effect expires
        for _ in 0..PowerUpKind::Expand.duration_ticks() {
            game.balls[0].pos = Vec2::new(200.0, 400.0);
            game.balls[0].vel = Vec2::new(3.0, -4.0);
            tick(&mut game);
        }
        assert_eq!(game.paddle.width, PADDLE_BASE_WIDTH);
    }
}
