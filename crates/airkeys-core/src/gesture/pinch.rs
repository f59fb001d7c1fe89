//! Pinch-click detection.
//!
//! A hand "clicks" the key under its index fingertip by bringing the index
//! and middle fingertips together.  Per hand, per frame:
//!
//! ```text
//!   index tip over no key ─────────────────────────────► Idle
//!   index tip over a key, tips apart (d ≥ sensitivity) ─► Hover
//!   index tip over a key, tips together (d < sensitivity) ► PressCandidate
//!        └─ debounce gate open ─► ClickEvent, clock advanced
//!        └─ gate closed ────────► no event (sustained pinch)
//! ```
//!
//! The debounce clock is global: one clock for every hand and every key.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::debounce::{DebounceClock, Gate};
use crate::domain::action::KeyAction;
use crate::domain::geometry::Point;
use crate::domain::hand::HandObservation;
use crate::domain::layout::{ButtonId, ButtonSet};

/// Thresholds for pinch detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchConfig {
    /// Fingertip separation, in frame pixels, below which the hand is
    /// pinching.
    pub sensitivity: f32,
    /// Minimum time between two accepted clicks.
    pub click_delay: Duration,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            sensitivity: 30.0,
            click_delay: Duration::from_millis(300),
        }
    }
}

/// Per-hand state in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchState {
    /// The index fingertip is not over any key.
    Idle,
    /// Over a key, fingertips apart.
    Hover,
    /// Over a key, fingertips pinched.
    PressCandidate,
}

/// An accepted click.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub button: ButtonId,
    pub label: String,
    pub action: KeyAction,
    /// Top-left corner of the clicked key, for click feedback.
    pub position: Point,
    pub at: Instant,
}

/// Result of evaluating one hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchReading {
    pub state: PinchState,
    /// Key under the index fingertip.
    pub hovered: Option<ButtonId>,
    /// Index-to-middle fingertip distance, when both are present and a key
    /// is hovered.
    pub distance: Option<f32>,
    /// Midpoint between the two fingertips, where a distance readout is drawn.
    pub midpoint: Option<Point>,
    /// Set only when the candidate passed the debounce gate.
    pub click: Option<ClickEvent>,
}

impl PinchReading {
    fn idle() -> Self {
        Self {
            state: PinchState::Idle,
            hovered: None,
            distance: None,
            midpoint: None,
            click: None,
        }
    }
}

/// Pinch-click detector with one debounce clock shared by all hands.
#[derive(Debug, Clone)]
pub struct PinchClickDetector {
    config: PinchConfig,
    clock: DebounceClock,
}

impl PinchClickDetector {
    pub fn new(config: PinchConfig) -> Self {
        Self {
            config,
            clock: DebounceClock::new(config.click_delay, Gate::AtLeast),
        }
    }

    /// Time of the last accepted click.
    pub fn last_click(&self) -> Option<Instant> {
        self.clock.last_accepted()
    }

    /// Evaluates one hand against the current button set.
    pub fn evaluate(
        &mut self,
        hand: &HandObservation,
        buttons: &ButtonSet,
        now: Instant,
    ) -> PinchReading {
        let Some(index_tip) = hand.index_tip() else {
            return PinchReading::idle();
        };
        let Some(button) = buttons.hit_test(index_tip) else {
            return PinchReading::idle();
        };

        let mut reading = PinchReading {
            state: PinchState::Hover,
            hovered: Some(button.id),
            distance: None,
            midpoint: None,
            click: None,
        };

        let Some(middle_tip) = hand.middle_tip() else {
            return reading;
        };
        let distance = index_tip.distance_to(&middle_tip);
        reading.distance = Some(distance);
        reading.midpoint = Some(index_tip.midpoint(&middle_tip));

        if distance >= self.config.sensitivity {
            return reading;
        }
        reading.state = PinchState::PressCandidate;

        if self.clock.try_accept(now) {
            debug!(key = %button.label, distance, "click accepted");
            reading.click = Some(ClickEvent {
                button: button.id,
                label: button.label.clone(),
                action: button.action.clone(),
                position: button.position(),
                at: now,
            });
        } else {
            trace!(key = %button.label, "click inside debounce window");
        }
        reading
    }
}

impl Default for PinchClickDetector {
    fn default() -> Self {
        Self::new(PinchConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
