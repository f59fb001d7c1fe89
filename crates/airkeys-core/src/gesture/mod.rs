//! Gesture detectors.
//!
//! Both detectors are sampled, not scheduled: the caller passes the current
//! monotonic time into every evaluation and no detector owns a timer.
//!
//! - **`debounce`** – A timestamp that gates repeated acceptance of one event
//!   family within a minimum interval.
//!
//! - **`pinch`** – One hand pointing at a key with index and middle
//!   fingertips pinched together produces a click.  All hands share one
//!   debounce clock, which caps the overall typing rate.
//!
//! - **`two_hand`** – Two wrists brought close together produce a
//!   layout-switch event, gated by a separate cooldown clock.

pub mod debounce;
pub mod pinch;
pub mod two_hand;
