//! Domain entities for AirKeys.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application.  Domain code has no imports from
//! camera drivers, pose-estimation models, OS input APIs, or file systems.
//! It can be compiled and tested on any machine without extra setup.
//!
//! Code in outer layers (the interaction loop, replay sources, input sinks)
//! depends on the domain, but the domain never depends on them.

/// Label classification: which action a key performs and how wide it is drawn.
pub mod action;

/// 2-D points, rectangles, and distances.
pub mod geometry;

/// Externally supplied hand observations.
pub mod hand;

/// Text buffer, modifier flags, and action resolution.
pub mod keyboard;

/// Key layouts, the layout registry, and generated button sets.
///
/// See [`layout::LayoutRegistry`] for the main type.
pub mod layout;

/// Per-frame hovered/pressed flags.
pub mod overlay;
