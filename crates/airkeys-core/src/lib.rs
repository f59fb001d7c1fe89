//! # airkeys-core
//!
//! Gesture interpretation engine for the AirKeys virtual keyboard: key
//! layouts, button hit-testing, pinch-click and two-hand gesture detection,
//! and the keyboard state those gestures mutate.
//!
//! This crate has zero dependencies on cameras, pose-estimation models,
//! windowing, or OS input APIs.  Everything here is plain data plus pure
//! functions over it, so every rule can be unit-tested with hand-written
//! keypoints.
//!
//! # Architecture overview (for beginners)
//!
//! AirKeys lets you type by pinching your index and middle fingertips together
//! while pointing at an on-screen key.  Bringing both wrists close together
//! switches to the next key layout.
//!
//! - **`domain`** – The vocabulary of the system: geometry, hand observations,
//!   key layouts and their generated buttons, the per-frame hover/press
//!   overlay, and the keyboard state (text buffer, modifiers, history).
//!
//! - **`gesture`** – The two detectors that turn raw keypoints into events:
//!   the pinch-click detector (one hand, debounced by a global clock) and the
//!   two-hand detector (wrist proximity, gated by a cooldown clock).

pub mod domain;
pub mod gesture;

// Re-export the most-used types at the crate root so callers can write
// `airkeys_core::LayoutRegistry` instead of the full module path.
pub use domain::action::{KeyAction, ModifierKey, SizeClass};
pub use domain::geometry::{Point, Rect};
pub use domain::hand::{BoundingBox, HandObservation, Handedness, Keypoint};
pub use domain::keyboard::{KeyOutcome, KeyboardState};
pub use domain::layout::{
    Button, ButtonId, ButtonSet, GridMetrics, Layout, LayoutError, LayoutId, LayoutRegistry,
};
pub use domain::overlay::ButtonOverlay;
pub use gesture::debounce::{DebounceClock, Gate};
pub use gesture::pinch::{ClickEvent, PinchClickDetector, PinchConfig, PinchReading, PinchState};
pub use gesture::two_hand::{LayoutSwitchEvent, TwoHandConfig, TwoHandDetector, TwoHandReading};
