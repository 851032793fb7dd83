//! Input debouncing for the prediction request path.
//!
//! A burst of edits collapses into a single request: each `schedule` call
//! replaces the pending deadline, and the event loop polls `fire` every
//! tick. Single-threaded by construction, so cancellation cannot race.

use std::time::{Duration, Instant};

/// One cancelable delayed action carrying the text to predict on.
pub struct Debounce {
    quiet: Duration,
    pending: Option<(Instant, String)>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// Supersede any pending action and arm a new one for `now + quiet`.
    pub fn schedule(&mut self, now: Instant, text: String) {
        self.pending = Some((now + self.quiet, text));
    }

    /// Drop the pending action. No-op when nothing is armed or it already fired.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Take the pending text if its deadline has passed. At most one action
    /// fires per schedule; firing disarms the timer.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, text)| text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn does_not_fire_before_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(QUIET);
        debounce.schedule(start, "abc".into());
        assert_eq!(debounce.fire(start), None);
        assert_eq!(debounce.fire(start + Duration::from_millis(299)), None);
    }

    #[test]
    fn fires_once_at_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(QUIET);
        debounce.schedule(start, "abc".into());
        assert_eq!(debounce.fire(start + QUIET), Some("abc".into()));
        // Already fired; later polls stay quiet
        assert_eq!(debounce.fire(start + QUIET * 2), None);
    }

    #[test]
    fn burst_coalesces_to_last_call() {
        let start = Instant::now();
        let mut debounce = Debounce::new(QUIET);
        debounce.schedule(start, "a".into());
        debounce.schedule(start + Duration::from_millis(100), "ab".into());
        debounce.schedule(start + Duration::from_millis(200), "abc".into());

        // The first two deadlines pass without firing
        assert_eq!(debounce.fire(start + Duration::from_millis(400)), None);
        // Only the action from the last call fires, at last-call-time + quiet
        assert_eq!(debounce.fire(start + Duration::from_millis(500)), Some("abc".into()));
    }

    #[test]
    fn cancel_is_idempotent() {
        let start = Instant::now();
        let mut debounce = Debounce::new(QUIET);
        debounce.cancel();
        debounce.schedule(start, "abc".into());
        debounce.cancel();
        debounce.cancel();
        assert_eq!(debounce.fire(start + QUIET), None);
    }
}
