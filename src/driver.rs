//! Simulation driver
//!
//! Owns a `Session` and the `Ticker`, and is the only place where elapsed
//! time turns into tick calls. Gates are re-read from the committed state
//! before every fire, so a fire is never dispatched after the state that
//! enabled it has changed (an impact at t=30ms cancels a scroll due at the
//! same instant).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{TickKind, Ticker};
use crate::consts::MAX_SUBSTEPS;
use crate::error::SimError;
use crate::session::{InputOutcome, Session};
use crate::sim::collision::Impact;
use crate::sim::rng::{GapRng, PcgGapRng};
use crate::sim::state::GameState;

/// What happened during one `advance` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub falls: u32,
    pub scrolls: u32,
    pub flaps: u32,
    pub recycled: usize,
    pub impact: Option<Impact>,
    /// Fire cap was hit; fires still due in the slice were skipped
    pub truncated: bool,
}

impl StepReport {
    pub fn fires(&self) -> u32 {
        self.falls + self.scrolls + self.flaps
    }
}

pub struct Driver<R: GapRng = PcgGapRng> {
    session: Session<R>,
    ticker: Ticker,
    /// Virtual time since the driver was created
    now: Duration,
}

impl<R: GapRng> Driver<R> {
    pub fn new(session: Session<R>) -> Self {
        let mut driver = Self {
            session,
            ticker: Ticker::new(),
            now: Duration::ZERO,
        };
        driver.sync_schedules();
        driver
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn snapshot(&self) -> Arc<GameState> {
        self.session.snapshot()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn on_viewport_ready(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        self.session.on_viewport_ready(width, height)?;
        self.sync_schedules();
        Ok(())
    }

    pub fn on_primary_input(&mut self) -> InputOutcome {
        self.on_primary_input_at(Utc::now())
    }

    pub fn on_primary_input_at(&mut self, at: DateTime<Utc>) -> InputOutcome {
        let outcome = self.session.on_primary_input_at(at);
        self.sync_schedules();
        outcome
    }

    /// Point every schedule at the period the current state calls for
    fn sync_schedules(&mut self) {
        let config = self.session.config();
        let physics = self.session.physics_active();
        let fall = physics.then(|| config.fall_period());
        let scroll = physics.then(|| config.scroll_period());
        let flap = self.session.animation_active().then(|| config.flap_period());

        self.ticker.schedule(TickKind::Fall, fall);
        self.ticker.schedule(TickKind::Scroll, scroll);
        self.ticker.schedule(TickKind::Flap, flap);
    }

    fn fire(&mut self, kind: TickKind, report: &mut StepReport) {
        match kind {
            TickKind::Fall => {
                report.falls += 1;
                if let Some(impact) = self.session.fall_tick() {
                    report.impact.get_or_insert(impact);
                }
            }
            TickKind::Scroll => {
                report.scrolls += 1;
                report.recycled += self.session.scroll_tick();
            }
            TickKind::Flap => {
                report.flaps += 1;
                self.session.frame_tick();
            }
        }
        self.sync_schedules();
    }

    /// Let `dt` of virtual time pass, dispatching fires in chronological order.
    ///
    /// At most `MAX_SUBSTEPS` fires are handled per call. If more are due
    /// within `dt`, they are skipped: the clock still moves the full `dt` and
    /// every schedule restarts its period from the end of the slice.
    pub fn advance(&mut self, dt: Duration) -> StepReport {
        let mut report = StepReport::default();
        let mut remaining = dt;

        loop {
            while report.fires() < MAX_SUBSTEPS {
                match self.ticker.take_due() {
                    Some(kind) => self.fire(kind, &mut report),
                    None => break,
                }
            }

            let next = self.ticker.next_due_in();
            if report.fires() >= MAX_SUBSTEPS && next.is_some_and(|wait| wait <= remaining) {
                log::warn!(
                    "Skipping backlog after {} fires; clock jumps {:?} to {:?}",
                    MAX_SUBSTEPS,
                    remaining,
                    self.now + remaining
                );
                self.ticker.restart();
                self.now += remaining;
                report.truncated = true;
                return report;
            }

            match next {
                Some(wait) if wait <= remaining => {
                    self.ticker.elapse(wait);
                    self.now += wait;
                    remaining -= wait;
                }
                _ => {
                    self.ticker.elapse(remaining);
                    self.now += remaining;
                    return report;
                }
            }
        }
    }
}
