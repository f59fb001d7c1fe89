//! # airkeys-app
//!
//! The frame-synchronous interaction loop of the AirKeys virtual keyboard,
//! together with the infrastructure it runs on: a replayed hand-tracking
//! recording as the frame source, stdout as the input-injection sink, a
//! TOML configuration file, and a plain-text exporter for the typed buffer.
//!
//! # Layers
//!
//! - **`application`** – [`InteractionLoop`](application::interaction_loop::InteractionLoop)
//!   and the ports it depends on, control commands, and the render snapshot.
//! - **`infrastructure`** – implementations of those ports plus configuration
//!   storage.  Every port has an in-memory mock next to the real thing.

pub mod application;
pub mod infrastructure;
