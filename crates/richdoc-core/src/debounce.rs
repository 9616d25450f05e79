//! Deadline-based debouncing for presentation refreshes.
//!
//! Rapid edit bursts should produce one relayout, not one per keystroke.
//! Callers arm the debouncer on every change and poll it from their event
//! loop; it reports ready once the deadline passes, then disarms until the
//! next burst.

use std::time::{Duration, Instant};

/// Default quiet period before a relayout pass runs after a burst of edits.
pub const RELAYOUT_DELAY: Duration = Duration::from_millis(60);

/// Coalesces bursts of events into a single deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    due: Option<Instant>,
}

impl Debouncer {
    /// A disarmed debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    /// The configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the deadline at `delay` from now. Re-arming pushes the deadline
    /// back, so a steady stream of events keeps deferring the flush.
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// Arm the deadline at `delay` from an explicit instant.
    pub fn schedule_at(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once per armed deadline, when it has elapsed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// [`Debouncer::poll`] against an explicit instant.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RELAYOUT_DELAY)
    }
}
