//! Hand observations supplied by the external hand-pose detector.
//!
//! The detector follows the 21-landmark hand model: landmark 0 is the wrist,
//! 4 the thumb tip, 8 the index fingertip, 12 the middle fingertip, and so
//! on.  The core only reads the three landmarks it needs and treats the rest
//! as opaque.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};

/// Landmark index of the wrist.
pub const WRIST: usize = 0;
/// Landmark index of the index fingertip.
pub const INDEX_TIP: usize = 8;
/// Landmark index of the middle fingertip.
pub const MIDDLE_TIP: usize = 12;

/// A single landmark position.  `z` is relative depth when the detector
/// provides it and is ignored by every gesture rule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Projects the keypoint onto the 2-D frame plane.
    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Bounding box around a detected hand, in frame space.
pub type BoundingBox = Rect;

/// Which hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand in one frame.
///
/// Read-only and frame-scoped: the core never keeps an observation past the
/// pass that received it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Ordered landmark list.
    pub keypoints: Vec<Keypoint>,
    /// Bounding box reported by the detector.
    pub bbox: BoundingBox,
    /// Left/right classification, when the detector provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
}

impl HandObservation {
    pub fn new(keypoints: Vec<Keypoint>, bbox: BoundingBox) -> Self {
        Self {
            keypoints,
            bbox,
            handedness: None,
        }
    }

    /// Returns landmark `index` as a frame-space point, or `None` if the
    /// detector supplied fewer landmarks.
    pub fn landmark(&self, index: usize) -> Option<Point> {
        self.keypoints.get(index).map(|k| k.to_point())
    }

    pub fn wrist(&self) -> Option<Point> {
        self.landmark(WRIST)
    }

    pub fn index_tip(&self) -> Option<Point> {
        self.landmark(INDEX_TIP)
    }

    pub fn middle_tip(&self) -> Option<Point> {
        self.landmark(MIDDLE_TIP)
    }

    /// Builds a 21-landmark observation with the wrist, index tip, and middle
    /// tip at the given points and every other landmark at the wrist.
    ///
    /// Handy for tests, benchmarks, and synthetic recordings.
    pub fn synthetic(wrist: Point, index_tip: Point, middle_tip: Point) -> Self {
        let mut keypoints = vec![Keypoint::new(wrist.x, wrist.y); 21];
        keypoints[INDEX_TIP] = Keypoint::new(index_tip.x, index_tip.y);
        keypoints[MIDDLE_TIP] = Keypoint::new(middle_tip.x, middle_tip.y);

        let xs = [wrist.x, index_tip.x, middle_tip.x];
        let ys = [wrist.y, index_tip.y, middle_tip.y];
        let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Self::new(
            keypoints,
            Rect::new(min_x, min_y, max_x - min_x, max_y - min_y),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
