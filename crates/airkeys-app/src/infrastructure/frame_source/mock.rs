//! Mock frame source for unit testing.
//!
//! Serves a scripted queue of frames without touching the file system or the
//! clock, and records whether the loop released it on exit.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use airkeys_core::HandObservation;

use super::{Frame, FrameError};
use crate::application::interaction_loop::FrameSource;

/// What happens once the scripted frames run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockEnding {
    /// Report [`FrameError::Exhausted`].
    #[default]
    Exhausted,
    /// Report a read failure, as an unplugged camera would.
    Failure,
}

/// A scripted [`FrameSource`].
#[derive(Debug, Default)]
pub struct MockFrameSource {
    frames: VecDeque<Frame>,
    next_sequence: u64,
    ending: MockEnding,
    /// Number of frames handed out so far.
    pub served: usize,
    /// Set once `release` has been called.
    pub released: bool,
}

impl MockFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes what the source reports after the last scripted frame.
    pub fn ending(mut self, ending: MockEnding) -> Self {
        self.ending = ending;
        self
    }

    /// Appends a 1280x720 frame captured `t_ms` after the start.
    pub fn push(&mut self, t_ms: u64, hands: Vec<HandObservation>) -> &mut Self {
        self.frames.push_back(Frame {
            sequence: self.next_sequence,
            timestamp: Duration::from_millis(t_ms),
            width: 1280,
            height: 720,
            detections: hands,
        });
        self.next_sequence += 1;
        self
    }

    /// Frames still queued.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FrameSource for MockFrameSource {
    async fn next_frame(&mut self) -> Result<Frame, FrameError> {
        if self.released {
            return Err(FrameError::Released);
        }
        match self.frames.pop_front() {
            Some(frame) => {
                self.served += 1;
                Ok(frame)
            }
            None => match self.ending {
                MockEnding::Exhausted => Err(FrameError::Exhausted),
                MockEnding::Failure => Err(FrameError::Read(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "mock camera disconnected",
                ))),
            },
        }
    }

    fn release(&mut self) {
        self.released = true;
    }
}
