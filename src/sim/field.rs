//! Obstacle and brick field generation
//!
//! Scrolling fields (pipes, platforms) spawn at the right edge, scroll
//! left each tick and are retired once fully past the left edge; every
//! retirement scores. The brick grid is static per level, cells only
//! flip alive -> destroyed. All randomness comes from a per-session
//! seeded Pcg32 so geometry is reproducible, and every draw is bounded
//! so dimensions are always positive and in range.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A pipe pair: one column with a gap the bird must thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge of the column
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
}

impl Pipe {
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + PIPE_GAP
    }
}

/// Scrolling pipe field for the obstacle-avoidance game.
#[derive(Debug, Clone)]
pub struct PipeField {
    pub pipes: Vec<Pipe>,
    field: Vec2,
    rng: Pcg32,
}

impl PipeField {
    pub fn new(field: Vec2, rng: Pcg32) -> Self {
        let mut this = Self {
            pipes: Vec::new(),
            field,
            rng,
        };
        this.spawn();
        this
    }

    fn spawn(&mut self) {
        let max_gap_y = self.field.y - PIPE_GAP_MARGIN - PIPE_GAP;
        let gap_y = self.rng.random_range(PIPE_GAP_MARGIN..=max_gap_y);
        self.pipes.push(Pipe {
            x: self.field.x,
            gap_y,
        });
    }

    /// Scroll, retire and respawn. Returns the number of pipes retired
    /// this tick (score increments for the caller).
    pub fn advance(&mut self) -> u32 {
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SCROLL_SPEED;
        }

        let before = self.pipes.len();
        self.pipes.retain(|p| p.x + PIPE_WIDTH >= 0.0);
        let retired = (before - self.pipes.len()) as u32;

        // Spawn once the rightmost pipe has cleared the spacing threshold
        let rightmost = self
            .pipes
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max);
        if self.pipes.is_empty() || rightmost < self.field.x - PIPE_SPACING {
            self.spawn();
        }

        retired
    }
}

/// A scrolling platform. `moving` platforms scroll faster than the base
/// rate, which reads as horizontal movement relative to the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub moving: bool,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// Scrolling platform field for the jumper game.
#[derive(Debug, Clone)]
pub struct PlatformField {
    pub platforms: Vec<Platform>,
    /// Base scroll speed; increases as platforms are retired
    pub scroll: f32,
    field: Vec2,
    rng: Pcg32,
}

impl PlatformField {
    pub fn new(field: Vec2, rng: Pcg32) -> Self {
        let mut this = Self {
            platforms: Vec::new(),
            scroll: PLATFORM_BASE_SCROLL,
            field,
            rng,
        };
        // Starting platform under the player, then fill to the cap
        this.platforms.push(Platform {
            pos: Vec2::new(field.x * 0.25, field.y * 0.75),
            width: PLATFORM_MAX_WIDTH,
            moving: false,
        });
        while this.platforms.len() < PLATFORM_CAP {
            this.spawn();
        }
        this
    }

    fn spawn(&mut self) {
        let width = self
            .rng
            .random_range(PLATFORM_MIN_WIDTH..=PLATFORM_MAX_WIDTH);
        // Keep platforms in the lower two thirds, reachable by one jump
        let min_y = self.field.y / 3.0;
        let max_y = self.field.y - PLATFORM_HEIGHT * 2.0;
        let y = self.rng.random_range(min_y..=max_y);
        let moving = self.rng.random_bool(MOVING_PLATFORM_CHANCE);

        // Spawn at the right edge, offset past any existing rightmost
        // platform to guarantee minimum spacing
        let rightmost = self
            .platforms
            .iter()
            .map(|p| p.right())
            .fold(f32::NEG_INFINITY, f32::max);
        let x = self.field.x.max(rightmost + PLATFORM_SPACING * 0.5);

        self.platforms.push(Platform {
            pos: Vec2::new(x, y),
            width,
            moving,
        });
    }

    /// Scroll, retire, speed up and respawn. Returns retired count.
    pub fn advance(&mut self) -> u32 {
        let scroll = self.scroll;
        for platform in &mut self.platforms {
            let speed = if platform.moving {
                scroll + MOVING_PLATFORM_BONUS
            } else {
                scroll
            };
            platform.pos.x -= speed;
        }

        let before = self.platforms.len();
        self.platforms.retain(|p| p.right() >= 0.0);
        let retired = (before - self.platforms.len()) as u32;

        // Difficulty ramp: each retirement speeds up the scroll
        self.scroll += retired as f32 * PLATFORM_SPEEDUP;

        // Top up to the cap; spawn() itself enforces spacing past the
        // rightmost platform
        while self.platforms.len() < PLATFORM_CAP {
            self.spawn();
        }

        retired
    }
}

/// Destructible brick grid, rows x cols, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    pub rows: usize,
    pub cols: usize,
    alive: Vec<bool>,
    brick_size: Vec2,
}

impl BrickGrid {
    pub fn new(rows: usize, cols: usize, field_width: f32) -> Self {
        let brick_w = field_width / cols.max(1) as f32;
        Self {
            rows,
            cols,
            alive: vec![true; rows * cols],
            brick_size: Vec2::new(brick_w, BRICK_HEIGHT),
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.alive[self.index(row, col)]
    }

    /// Each cell is destroyed at most once.
    pub fn destroy(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        self.alive[idx] = false;
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.alive.iter().all(|&a| !a)
    }

    /// Top-left corner and size of a cell's rectangle.
    pub fn brick_rect(&self, row: usize, col: usize) -> (Vec2, Vec2) {
        let pos = Vec2::new(
            col as f32 * self.brick_size.x,
            BRICK_TOP_OFFSET + row as f32 * self.brick_size.y,
        );
        (pos, self.brick_size)
    }

    /// Alive cells in row-major order (the brick collision scan order).
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.is_alive(r, c))
    }

    /// Alive flags in row-major order, for snapshots.
    pub fn cells(&self) -> &[bool] {
        &self.alive
    }
}
