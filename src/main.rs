//! Headless autoplay demo
//!
//! Runs each mini-game with a simple tracking AI and logs the outcome.
//! Useful for eyeballing balance changes and as an end-to-end smoke
//! test of the simulation core.

use petcade::consts::*;
use petcade::sim::{
    BreakerConfig, BreakerGame, FlappyConfig, FlappyGame, GameEvent, JumperConfig, JumperGame,
    Session,
};

/// Wall-clock slice fed to the session per driver iteration (one tick).
const FRAME: f32 = TICK_SECONDS;

fn main() {
    env_logger::init();

    let seed = 42;
    run_flappy(seed);
    run_jumper(seed);
    run_breaker(seed);
}

fn run_flappy(seed: u64) {
    let mut session = Session::new(FlappyGame::new(FlappyConfig {
        seed,
        ..Default::default()
    }));

    let mut coins = 0;
    for _ in 0..20_000 {
        // Flap whenever the bird sinks below the next gap's center
        let snap = session.snapshot();
        let target = snap
            .pipes
            .iter()
            .filter(|p| p.x + PIPE_WIDTH > snap.bird_pos.x)
            .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
            .map(|p| p.gap_y + PIPE_GAP / 2.0)
            .unwrap_or(FIELD_HEIGHT / 2.0);
        if snap.bird_pos.y + BIRD_SIZE / 2.0 > target {
            session.input_mut().flap = true;
        }

        for event in session.advance(FRAME) {
            if let GameEvent::GameOver { coins: earned } = event {
                coins = earned;
            }
        }
        if session.is_terminal() {
            break;
        }
    }
    log::info!("flappy run over, coins: {coins}");
}

fn run_jumper(seed: u64) {
    let mut session = Session::new(JumperGame::new(JumperConfig {
        seed,
        ..Default::default()
    }));

    let mut coins = 0;
    for _ in 0..20_000 {
        // Hop constantly; landing restores eligibility
        if session.snapshot().grounded {
            session.input_mut().jump = true;
        }

        for event in session.advance(FRAME) {
            if let GameEvent::GameOver { coins: earned } = event {
                coins = earned;
            }
        }
        if session.is_terminal() {
            break;
        }
    }
    log::info!("jumper run over, coins: {coins}");
}

fn run_breaker(seed: u64) {
    let mut session = Session::new(BreakerGame::new(BreakerConfig {
        seed,
        ..Default::default()
    }));

    let mut coins = 0;
    for _ in 0..60_000 {
        // Track the lowest descending ball
        let snap = session.snapshot();
        let target = snap
            .balls
            .iter()
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|b| b.center().x);
        if let Some(x) = target {
            session.input_mut().paddle_x = Some(x);
        }

        for event in session.advance(FRAME) {
            match event {
                GameEvent::LevelCleared { level, bonus } => {
                    log::debug!("cleared level {level}, bonus {bonus}");
                }
                GameEvent::GameOver { coins: earned } => {
                    coins = earned;
                }
                _ => {}
            }
        }
        if session.is_terminal() {
            break;
        }
    }

    let snapshot = session.snapshot();
    match serde_json::to_string(&snapshot) {
        Ok(json) => log::debug!("final breaker snapshot: {json}"),
        Err(err) => log::warn!("snapshot serialization failed: {err}"),
    }
    log::info!("breaker run over, coins: {coins}");
}
