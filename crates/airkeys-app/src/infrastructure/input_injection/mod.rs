//! Input-injection sinks.
//!
//! Typed characters leave AirKeys through an
//! [`InputSink`](crate::application::interaction_loop::InputSink).  The
//! shipped sink writes them to stdout, which lets another program (or a
//! shell pipe) consume them as if they came from a keyboard.  A sink that
//! synthesises OS key events would slot in here next to it.

pub mod mock;
pub mod stdout;
