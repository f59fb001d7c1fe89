//! Frame acquisition infrastructure.
//!
//! A live build would pull images from a camera and hand them to a
//! pose-estimation model.  AirKeys instead replays recordings of what such a
//! model reported: one JSON object per line, each holding the capture time
//! and the detected hands.  [`ReplayFrameSource`](replay::ReplayFrameSource)
//! turns those lines into [`Frame`]s, and
//! [`RecordedHandDetector`](replay::RecordedHandDetector) plays the role of the
//! pose model by returning the recorded hands.
//!
//! # Recording format
//!
//! ```json
//! {"t_ms": 0, "hands": []}
//! {"t_ms": 33, "hands": [{"keypoints": [{"x": 612.0, "y": 540.0}, ...], "bbox": {...}}]}
//! ```
//!
//! Blank lines are skipped.  `hands` may be omitted for an empty frame.
//!
//! # Testability
//!
//! [`MockFrameSource`](mock::MockFrameSource) serves a scripted queue of
//! frames and records whether it was released.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use airkeys_core::HandObservation;

pub mod mock;
pub mod replay;

/// One captured frame.
///
/// The image itself is not carried.  `detections` holds whatever the
/// capture stage already knows about the hands in it; the hand detector
/// decides what to make of that.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the stream, starting at 0.
    pub sequence: u64,
    /// Capture time relative to the start of the stream.
    pub timestamp: Duration,
    pub width: u32,
    pub height: u32,
    pub detections: Vec<HandObservation>,
}

/// A single line of a recording.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordedFrame {
    pub t_ms: u64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

/// Error type for frame acquisition.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended normally.
    #[error("frame source exhausted")]
    Exhausted,

    /// The source could not be opened.
    #[error("frame source {path} unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the next frame failed after the source was opened.
    #[error("failed to read frame: {0}")]
    Read(#[from] std::io::Error),

    /// A recording line was not a valid frame.
    #[error("line {line} is not a valid frame: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// `next_frame` was called after `release`.
    #[error("frame source already released")]
    Released,
}
