//! Virtual-time schedules
//!
//! Each `Interval` is one logical timer: at most one active period, first
//! fire after a full period, and stopping drops whatever was pending.
//! Re-scheduling with the same period keeps the running phase, so callers
//! can re-apply their gates every step without restarting the timer.

use std::time::Duration;

/// A periodic timer driven by elapsed time rather than the wall clock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interval {
    period: Option<Duration>,
    elapsed: Duration,
}

impl Interval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start, stop (`None`) or re-period the timer.
    ///
    /// A different period restarts the phase; the same period is a no-op.
    pub fn schedule(&mut self, period: Option<Duration>) {
        if period == self.period {
            return;
        }
        self.period = period.filter(|p| !p.is_zero());
        self.elapsed = Duration::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Time left until the next fire
    pub fn remaining(&self) -> Option<Duration> {
        self.period.map(|p| p.saturating_sub(self.elapsed))
    }

    /// Drop accumulated time, keeping the period
    fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn elapse(&mut self, dt: Duration) {
        if self.period.is_some() {
            self.elapsed += dt;
        }
    }

    /// Consume one due fire, if any
    fn take_due(&mut self) -> bool {
        match self.period {
            Some(period) if self.elapsed >= period => {
                self.elapsed -= period;
                true
            }
            _ => false,
        }
    }
}

/// Which schedule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Agent fall + collision
    Fall,
    /// Obstacle scroll + recycle
    Scroll,
    /// Flap animation frame
    Flap,
}

/// The three independent schedules of the game
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    fall: Interval,
    scroll: Interval,
    flap: Interval,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    fn interval_mut(&mut self, kind: TickKind) -> &mut Interval {
        match kind {
            TickKind::Fall => &mut self.fall,
            TickKind::Scroll => &mut self.scroll,
            TickKind::Flap => &mut self.flap,
        }
    }

    pub fn interval(&self, kind: TickKind) -> &Interval {
        match kind {
            TickKind::Fall => &self.fall,
            TickKind::Scroll => &self.scroll,
            TickKind::Flap => &self.flap,
        }
    }

    pub fn schedule(&mut self, kind: TickKind, period: Option<Duration>) {
        self.interval_mut(kind).schedule(period);
    }

    /// Shortest wait until any active schedule fires
    pub fn next_due_in(&self) -> Option<Duration> {
        [&self.fall, &self.scroll, &self.flap]
            .into_iter()
            .filter_map(Interval::remaining)
            .min()
    }

    /// Let `dt` pass on every active schedule
    pub fn elapse(&mut self, dt: Duration) {
        self.fall.elapse(dt);
        self.scroll.elapse(dt);
        self.flap.elapse(dt);
    }

    /// Forget any backlog: every active schedule waits a full period again
    pub fn restart(&mut self) {
        self.fall.restart();
        self.scroll.restart();
        self.flap.restart();
    }

    /// Next due fire in a fixed order (fall, scroll, flap)
    pub fn take_due(&mut self) -> Option<TickKind> {
        [TickKind::Fall, TickKind::Scroll, TickKind::Flap]
            .into_iter()
            .find(|&kind| self.interval_mut(kind).take_due())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_no_leading_fire() {
        let mut interval = Interval::new();
        interval.schedule(Some(30 * MS));
        assert!(!interval.take_due());
        interval.elapse(29 * MS);
        assert!(!interval.take_due());
        interval.elapse(MS);
        assert!(interval.take_due());
        assert!(!interval.take_due());
    }

    #[test]
    fn test_stop_drops_pending_fire() {
        let mut interval = Interval::new();
        interval.schedule(Some(30 * MS));
        interval.elapse(45 * MS);
        interval.schedule(None);
        assert!(!interval.take_due());
        interval.elapse(100 * MS);
        assert!(!interval.take_due());
        assert_eq!(interval.remaining(), None);
    }

    #[test]
    fn test_same_period_keeps_phase() {
        let mut interval = Interval::new();
        interval.schedule(Some(30 * MS));
        interval.elapse(20 * MS);
        interval.schedule(Some(30 * MS));
        assert_eq!(interval.remaining(), Some(10 * MS));
    }

    #[test]
    fn test_new_period_restarts() {
        let mut interval = Interval::new();
        interval.schedule(Some(30 * MS));
        interval.elapse(20 * MS);
        interval.schedule(Some(50 * MS));
        assert_eq!(interval.remaining(), Some(50 * MS));
    }

    #[test]
    fn test_zero_period_is_stopped() {
        let mut interval = Interval::new();
        interval.schedule(Some(Duration::ZERO));
        assert!(!interval.is_active());
    }

    #[test]
    fn test_ticker_orders_simultaneous_fires() {
        let mut ticker = Ticker::new();
        ticker.schedule(TickKind::Fall, Some(50 * MS));
        ticker.schedule(TickKind::Scroll, Some(50 * MS));
        ticker.schedule(TickKind::Flap, Some(100 * MS));

        assert_eq!(ticker.next_due_in(), Some(50 * MS));
        ticker.elapse(50 * MS);
        assert_eq!(ticker.take_due(), Some(TickKind::Fall));
        assert_eq!(ticker.take_due(), Some(TickKind::Scroll));
        assert_eq!(ticker.take_due(), None);
        assert_eq!(ticker.next_due_in(), Some(50 * MS));
    }

    #[test]
    fn test_restart_drops_backlog() {
        let mut ticker = Ticker::new();
        ticker.schedule(TickKind::Fall, Some(30 * MS));
        ticker.schedule(TickKind::Flap, Some(100 * MS));
        ticker.elapse(250 * MS);
        ticker.restart();
        assert_eq!(ticker.take_due(), None);
        assert_eq!(ticker.interval(TickKind::Fall).remaining(), Some(30 * MS));
        assert_eq!(ticker.interval(TickKind::Flap).remaining(), Some(100 * MS));
        assert!(!ticker.interval(TickKind::Scroll).is_active());
    }

    #[test]
    fn test_idle_ticker_has_nothing_due() {
        let ticker = Ticker::new();
        assert_eq!(ticker.next_due_in(), None);
        assert!(!ticker.interval(TickKind::Flap).is_active());
    }
}
