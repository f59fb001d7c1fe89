//! Replay of recorded hand-tracking sessions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::time::Instant;
use tracing::{debug, info};

use airkeys_core::{HandObservation, Keypoint, Rect};

use super::{Frame, FrameError, RecordedFrame};
use crate::application::interaction_loop::{FrameSource, HandDetector};

/// Serves frames from a JSON-lines recording.
///
/// When pacing is on, each frame is held back until its recorded offset
/// from the first frame has elapsed, so a replay runs at capture speed.
pub struct ReplayFrameSource<R = BufReader<File>> {
    lines: Option<Lines<R>>,
    line_no: usize,
    sequence: u64,
    width: u32,
    height: u32,
    pace: bool,
    /// Wall-clock instant and recorded `t_ms` of the first frame served.
    origin: Option<(Instant, u64)>,
}

impl ReplayFrameSource {
    /// Opens a recording file.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Unavailable`] if the file cannot be opened.
    pub async fn open(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        pace: bool,
    ) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|source| FrameError::Unavailable {
                path: PathBuf::from(path),
                source,
            })?;
        info!(path = %path.display(), pace, "replaying recording");
        Ok(Self::from_reader(BufReader::new(file), width, height, pace))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ReplayFrameSource<R> {
    /// Replays frames from any buffered reader.
    pub fn from_reader(reader: R, width: u32, height: u32, pace: bool) -> Self {
        Self {
            lines: Some(reader.lines()),
            line_no: 0,
            sequence: 0,
            width,
            height,
            pace,
            origin: None,
        }
    }

    /// Next non-blank line, or `None` at end of stream.
    async fn next_record(&mut self) -> Result<Option<RecordedFrame>, FrameError> {
        let lines = self.lines.as_mut().ok_or(FrameError::Released)?;
        while let Some(line) = lines.next_line().await? {
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| FrameError::Decode {
                line: self.line_no,
                source,
            })?;
            return Ok(Some(record));
        }
        Ok(None)
    }

    async fn wait_for(&mut self, t_ms: u64) {
        let (start, first_t_ms) = *self.origin.get_or_insert_with(|| (Instant::now(), t_ms));
        if !self.pace {
            return;
        }
        let offset = Duration::from_millis(t_ms.saturating_sub(first_t_ms));
        tokio::time::sleep_until(start + offset).await;
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FrameSource for ReplayFrameSource<R> {
    async fn next_frame(&mut self) -> Result<Frame, FrameError> {
        let Some(record) = self.next_record().await? else {
            return Err(FrameError::Exhausted);
        };
        self.wait_for(record.t_ms).await;

        let frame = Frame {
            sequence: self.sequence,
            timestamp: Duration::from_millis(record.t_ms),
            width: self.width,
            height: self.height,
            detections: record.hands,
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if self.lines.take().is_some() {
            debug!(frames = self.sequence, "recording released");
        }
    }
}

/// Hand detector that returns the detections carried by a replayed frame.
///
/// With `mirror` on, every x coordinate is flipped around the frame width
/// (`x' = width - x`) so the hands appear as in a mirror, which is how a
/// user facing the camera expects to see them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedHandDetector {
    mirror: bool,
}

impl RecordedHandDetector {
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }
}

impl HandDetector for RecordedHandDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<HandObservation> {
        if !self.mirror {
            return frame.detections.clone();
        }
        let width = frame.width as f32;
        frame
            .detections
            .iter()
            .map(|hand| mirror_hand(hand, width))
            .collect()
    }
}

fn mirror_hand(hand: &HandObservation, width: f32) -> HandObservation {
    let keypoints = hand
        .keypoints
        .iter()
        .map(|k| Keypoint {
            x: width - k.x,
            ..*k
        })
        .collect();
    let bbox = Rect::new(
        width - (hand.bbox.x + hand.bbox.width),
        hand.bbox.y,
        hand.bbox.width,
        hand.bbox.height,
    );
    HandObservation {
        keypoints,
        bbox,
        handedness: hand.handedness,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
