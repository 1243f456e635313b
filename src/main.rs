//! Flappy Sim headless runner
//!
//! Plays one round with the autopilot in virtual time and logs the outcome.
//! Usage: `flappy-sim [config.json]`, log level via `RUST_LOG`.

use std::process::ExitCode;
use std::time::Duration;

use flappy_sim::autopilot;
use flappy_sim::{Driver, InputOutcome, Session, SimConfig, SimError};

/// Viewport used when no renderer is attached
const VIEWPORT: (f32, f32) = (400.0, 600.0);
/// Render-frame cadence of the runner
const FRAME: Duration = Duration::from_millis(16);
/// Give up after this much virtual time
const MAX_RUN: Duration = Duration::from_secs(120);

fn run() -> Result<(), SimError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut driver = Driver::new(Session::new(config)?);
    driver.on_viewport_ready(VIEWPORT.0, VIEWPORT.1)?;

    if let InputOutcome::RoundStarted(id) = driver.on_primary_input() {
        log::info!("Autopilot playing round {}", id);
    }

    let mut flaps = 0u32;
    let mut recycled = 0usize;
    let impact = loop {
        let report = driver.advance(FRAME);
        recycled += report.recycled;
        if let Some(impact) = report.impact {
            break Some(impact);
        }
        if driver.now() >= MAX_RUN {
            break None;
        }

        let state = driver.snapshot();
        if autopilot::should_flap(&state, driver.session().config()) {
            flaps += 1;
            if let InputOutcome::Crashed(impact) = driver.on_primary_input() {
                break Some(impact);
            }
        }
    };

    let state = driver.snapshot();
    match impact {
        Some(impact) => log::info!(
            "Round over after {:.2}s: {:?} ({} flaps, {} gates recycled)",
            driver.now().as_secs_f32(),
            impact,
            flaps,
            recycled
        ),
        None => log::info!(
            "Autopilot survived {}s ({} flaps, {} gates recycled)",
            MAX_RUN.as_secs(),
            flaps,
            recycled
        ),
    }

    if let Some(round) = state.rounds.latest() {
        println!(
            "round {} started {} survived {} ticks",
            round.id,
            round.timestamp_iso(),
            state.time_ticks
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Flappy Sim (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("flappy-sim: {}", e);
            ExitCode::FAILURE
        }
    }
}
