//! Mock input sink for unit testing.
//!
//! Records every injected string in a `Mutex<Vec<String>>` so tests can
//! assert exactly what would have been typed, and in what order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every injection fail, for exercising
//! the loop's error path.

use std::sync::Mutex;

use crate::application::interaction_loop::{InputSink, SinkError};

/// A sink that records injections instead of performing them.
#[derive(Debug, Default)]
pub struct MockInputSink {
    pub injected: Mutex<Vec<String>>,
    pub should_fail: bool,
}

impl MockInputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every injection fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// All injected strings concatenated.
    pub fn typed(&self) -> String {
        self.injected
            .lock()
            .map(|guard| guard.concat())
            .unwrap_or_default()
    }
}

impl InputSink for MockInputSink {
    fn inject(&self, text: &str) -> Result<(), SinkError> {
        if self.should_fail {
            return Err(SinkError::Rejected {
                text: text.to_string(),
                reason: "mock failure".to_string(),
            });
        }
        self.injected
            .lock()
            .map_err(|_| SinkError::Rejected {
                text: text.to_string(),
                reason: "mock sink lock poisoned".to_string(),
            })?
            .push(text.to_string());
        Ok(())
    }
}
