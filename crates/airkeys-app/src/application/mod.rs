//! Application layer: the interaction loop and what it exposes.

pub mod control;
pub mod interaction_loop;
pub mod render_state;
