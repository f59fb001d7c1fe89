//! Debounce clocks.

use std::time::{Duration, Instant};

/// How the elapsed time is compared against the minimum interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Accept when `elapsed >= min_interval`.
    AtLeast,
    /// Accept when `elapsed > min_interval`.
    Exceeds,
}

/// Gates one family of events to at most one acceptance per interval.
///
/// The first candidate is always accepted.  Rejected candidates leave the
/// clock untouched, so a sustained gesture cannot push its own window
/// forward.
#[derive(Debug, Clone)]
pub struct DebounceClock {
    min_interval: Duration,
    gate: Gate,
    last_accepted: Option<Instant>,
}

impl DebounceClock {
    pub fn new(min_interval: Duration, gate: Gate) -> Self {
        Self {
            min_interval,
            gate,
            last_accepted: None,
        }
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Returns `true` if a candidate at `now` would be accepted, without
    /// recording it.
    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                match self.gate {
                    Gate::AtLeast => elapsed >= self.min_interval,
                    Gate::Exceeds => elapsed > self.min_interval,
                }
            }
        }
    }

    /// Accepts the candidate at `now` if the gate is open and records it.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if self.is_open(now) {
            self.last_accepted = Some(now);
            true
        } else {
            false
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_candidate_is_accepted() {
        let mut clock = DebounceClock::new(ms(300), Gate::AtLeast);
        assert!(clock.try_accept(Instant::now()));
    }

    #[test]
    fn test_candidate_inside_window_is_rejected() {
        let t0 = Instant::now();
        let mut clock = DebounceClock::new(ms(300), Gate::AtLeast);
        assert!(clock.try_accept(t0));
        assert!(!clock.try_accept(t0 + ms(100)));
        assert!(!clock.try_accept(t0 + ms(299)));
    }

    #[test]
    fn test_at_least_gate_accepts_on_boundary() {
        let t0 = Instant::now();
        let mut clock = DebounceClock::new(ms(300), Gate::AtLeast);
        clock.try_accept(t0);
        assert!(clock.try_accept(t0 + ms(300)));
    }

    #[test]
    fn test_exceeds_gate_rejects_on_boundary() {
        let t0 = Instant::now();
        let mut clock = DebounceClock::new(ms(2000), Gate::Exceeds);
        clock.try_accept(t0);
        assert!(!clock.try_accept(t0 + ms(2000)));
        assert!(clock.try_accept(t0 + ms(2001)));
    }

    #[test]
    fn test_rejection_does_not_move_the_window() {
        let t0 = Instant::now();
        let mut clock = DebounceClock::new(ms(300), Gate::AtLeast);
        clock.try_accept(t0);
        // A sustained candidate every 100ms must still fire at t0 + 300ms.
        assert!(!clock.try_accept(t0 + ms(100)));
        assert!(!clock.try_accept(t0 + ms(200)));
        assert!(clock.try_accept(t0 + ms(300)));
        assert_eq!(clock.last_accepted(), Some(t0 + ms(300)));
    }

    #[test]
    fn test_is_open_does_not_record() {
        let t0 = Instant::now();
        let mut clock = DebounceClock::new(ms(300), Gate::AtLeast);
        assert!(clock.is_open(t0));
        assert!(clock.last_accepted().is_none());
        clock.try_accept(t0);
        assert!(!clock.is_open(t0 + ms(10)));
    }
}
