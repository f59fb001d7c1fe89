//! Two-hand layout-switch detection.
//!
//! Only the first two reported hands are considered.  Their wrist distance
//! drives two thresholds:
//!
//! - below `advisory_distance` the reading is flagged so a renderer can draw
//!   a connecting line; nothing else happens;
//! - below `switch_distance`, and with the cooldown elapsed, a
//!   [`LayoutSwitchEvent`] is emitted.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::debounce::{DebounceClock, Gate};
use crate::domain::geometry::Point;
use crate::domain::hand::HandObservation;

/// Thresholds for the two-hand gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoHandConfig {
    pub advisory_distance: f32,
    pub switch_distance: f32,
    /// A switch is accepted only once this much time has strictly passed
    /// since the previous one.
    pub cooldown: Duration,
}

impl Default for TwoHandConfig {
    fn default() -> Self {
        Self {
            advisory_distance: 200.0,
            switch_distance: 100.0,
            cooldown: Duration::from_secs(2),
        }
    }
}

/// An accepted layout switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSwitchEvent {
    pub wrist_distance: f32,
    pub at: Instant,
}

/// Result of evaluating a frame with at least two hands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoHandReading {
    /// Wrist of the first and second hand.
    pub wrists: (Point, Point),
    pub wrist_distance: f32,
    /// Hands are close enough to show the proximity advisory.
    pub advisory: bool,
    /// Set only when the switch passed the cooldown gate.
    pub switch: Option<LayoutSwitchEvent>,
}

/// Wrist-proximity detector with its own cooldown clock.
#[derive(Debug, Clone)]
pub struct TwoHandDetector {
    config: TwoHandConfig,
    clock: DebounceClock,
}

impl TwoHandDetector {
    pub fn new(config: TwoHandConfig) -> Self {
        Self {
            config,
            clock: DebounceClock::new(config.cooldown, Gate::Exceeds),
        }
    }

    /// Time of the last accepted switch.
    pub fn last_switch(&self) -> Option<Instant> {
        self.clock.last_accepted()
    }

    /// Evaluates the first two hands of a frame.
    ///
    /// Returns `None` when fewer than two hands are present or either lacks
    /// a wrist landmark.
    pub fn evaluate(&mut self, hands: &[HandObservation], now: Instant) -> Option<TwoHandReading> {
        let [first, second, ..] = hands else {
            return None;
        };
        let wrists = (first.wrist()?, second.wrist()?);
        let wrist_distance = wrists.0.distance_to(&wrists.1);

        let mut switch = None;
        if wrist_distance < self.config.switch_distance {
            if self.clock.try_accept(now) {
                debug!(wrist_distance, "layout switch accepted");
                switch = Some(LayoutSwitchEvent {
                    wrist_distance,
                    at: now,
                });
            } else {
                trace!(wrist_distance, "layout switch inside cooldown");
            }
        }

        Some(TwoHandReading {
            wrists,
            wrist_distance,
            advisory: wrist_distance < self.config.advisory_distance,
            switch,
        })
    }
}

impl Default for TwoHandDetector {
    fn default() -> Self {
        Self::new(TwoHandConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
