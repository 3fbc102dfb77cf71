//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (50 Hz)
//! - Seeded RNG only
//! - All mutation happens inside a tick; input is latched between ticks
//! - No rendering or platform dependencies

pub mod body;
pub mod breaker;
pub mod clock;
pub mod engine;
pub mod field;
pub mod flappy;
pub mod jumper;
pub mod powerup;

pub use body::Body;
pub use breaker::{BreakerConfig, BreakerGame, BreakerInput, BreakerSession, BreakerSnapshot};
pub use clock::FixedClock;
pub use engine::{GameEvent, GameRules, Session};
pub use field::{BrickGrid, Pipe, PipeField, Platform, PlatformField};
pub use flappy::{FlappyConfig, FlappyGame, FlappyInput, FlappySession, FlappySnapshot};
pub use jumper::{JumperConfig, JumperGame, JumperInput, JumperSession, JumperSnapshot};
pub use powerup::{ActiveModifiers, ModifierChange, PowerUp, PowerUpKind};
