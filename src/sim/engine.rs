//! Session wrapper shared by all three mini-games
//!
//! Each game plugs its rule set into [`Session`], which owns the fixed
//! clock, latches external input between ticks, collects events and
//! guarantees the terminal event fires exactly once. The presentation
//! layer never touches game state directly; it reads snapshots and
//! drains events.

use serde::Serialize;

use super::clock::FixedClock;
use super::powerup::PowerUpKind;

/// Events emitted during a tick, drained by the caller.
///
/// `GameOver` is the sole handoff to the wallet collaborator: it carries
/// the coins earned in this session and fires exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// An obstacle or platform scrolled off and was retired
    ObstaclePassed { total: u32 },
    BrickDestroyed { row: usize, col: usize, points: u32 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCaught { kind: PowerUpKind },
    /// All bricks cleared; bonus already added to the score
    LevelCleared { level: u32, bonus: u32 },
    GameOver { coins: u32 },
}

/// The capability set each mini-game implements: advance one step,
/// expose a read-only snapshot, report score and terminal state.
pub trait GameRules {
    /// Latched input, consumed (one-shots cleared) by `tick`.
    type Input: Default;
    /// Read-only view handed to the renderer.
    type Snapshot: Serialize;

    fn tick(&mut self, input: &mut Self::Input, events: &mut Vec<GameEvent>);
    fn snapshot(&self) -> Self::Snapshot;
    fn score(&self) -> u32;
    fn is_terminal(&self) -> bool;
    /// Reset for a fresh attempt (retry-after-loss semantics).
    fn reset(&mut self);
}

/// One play-through of a mini-game, from start to terminal or close.
pub struct Session<R: GameRules> {
    rules: R,
    clock: FixedClock,
    input: R::Input,
    paused: bool,
    game_over_emitted: bool,
}

impl<R: GameRules> Session<R> {
    /// Create a session with its clock already running.
    pub fn new(rules: R) -> Self {
        let mut clock = FixedClock::default();
        clock.start();
        Self {
            rules,
            clock,
            input: R::Input::default(),
            paused: false,
            game_over_emitted: false,
        }
    }

    /// Latch input for the next tick.
    pub fn input_mut(&mut self) -> &mut R::Input {
        &mut self.input
    }

    /// Feed elapsed wall time and run the due fixed steps, returning the
    /// events they produced. Paused or terminal sessions consume time
    /// without simulating.
    pub fn advance(&mut self, elapsed: f32) -> Vec<GameEvent> {
        let steps = self.clock.advance(elapsed);
        let mut events = Vec::new();
        for _ in 0..steps {
            self.step(&mut events);
        }
        events
    }

    /// Run exactly one fixed step (testing and lockstep drivers).
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.clock.is_running() {
            self.clock.advance(crate::consts::TICK_SECONDS);
            self.step(&mut events);
        }
        events
    }

    fn step(&mut self, events: &mut Vec<GameEvent>) {
        if self.paused || self.rules.is_terminal() {
            self.finish_if_terminal(events);
            return;
        }
        self.rules.tick(&mut self.input, events);
        self.finish_if_terminal(events);
    }

    fn finish_if_terminal(&mut self, events: &mut Vec<GameEvent>) {
        if self.rules.is_terminal() && !self.game_over_emitted {
            self.game_over_emitted = true;
            events.push(GameEvent::GameOver {
                coins: self.rules.score(),
            });
            // Stopping here cancels every outstanding timer: all timed
            // effects are tick counters that only move inside a step.
            self.clock.stop();
            log::info!("session over, coins earned: {}", self.rules.score());
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_terminal(&self) -> bool {
        self.rules.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.rules.score()
    }

    pub fn snapshot(&self) -> R::Snapshot {
        self.rules.snapshot()
    }

    /// Restart in place for a fresh attempt. Clears latched input and
    /// restarts the clock; the rule set resets its own entities.
    pub fn restart(&mut self) {
        self.rules.reset();
        self.input = R::Input::default();
        self.paused = false;
        self.game_over_emitted = false;
        self.clock.reset();
        self.clock.start();
    }

    /// Tear down the session, returning the final score.
    pub fn close(mut self) -> u32 {
        self.clock.stop();
        self.rules.score()
    }
}
