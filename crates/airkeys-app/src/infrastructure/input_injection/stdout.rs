//! Stdout input sink.

use std::io::Write;

use tracing::trace;

use crate::application::interaction_loop::{InputSink, SinkError};

/// Writes each injected string to stdout and flushes immediately, so a
/// downstream reader sees every character as soon as it is typed.
///
/// Logging goes to stderr, keeping stdout limited to typed text.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutInputSink;

impl StdoutInputSink {
    pub fn new() -> Self {
        Self
    }
}

impl InputSink for StdoutInputSink {
    fn inject(&self, text: &str) -> Result<(), SinkError> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        trace!(text, "injected");
        Ok(())
    }
}
