//! Read-only view of the loop state for a renderer.
//!
//! A [`RenderSnapshot`] is rebuilt on demand from the loop's state and never
//! written back.  Everything a renderer needs to draw a frame is here: the
//! buttons with their per-frame flags, the tail of the text buffer wrapped to
//! the display width, the status line, and the optional gesture overlays.

use std::fmt;

use serde::Serialize;

use airkeys_core::{Button, ButtonId, ButtonOverlay, Point, Rect};

/// Display options that affect the snapshot but not the gesture pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySettings {
    /// How many wrapped lines of the buffer are shown.
    pub display_lines: usize,
    /// A line is closed before it would reach this many characters.
    pub wrap_width: usize,
    /// Include per-hand fingertip distance readouts.
    pub show_distance: bool,
    /// Include the raw hand landmarks.
    pub show_landmarks: bool,
    pub theme: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_lines: 2,
            wrap_width: 50,
            show_distance: true,
            show_landmarks: true,
            theme: "dark".to_string(),
        }
    }
}

/// One button with the flags from the current frame's overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub id: ButtonId,
    pub label: String,
    pub rect: Rect,
    pub hovered: bool,
    pub pressed: bool,
}

impl ButtonView {
    pub fn new(button: &Button, overlay: &ButtonOverlay) -> Self {
        Self {
            id: button.id,
            label: button.label.clone(),
            rect: button.rect,
            hovered: overlay.is_hovered(button.id),
            pressed: overlay.is_pressed(button.id),
        }
    }
}

/// `Layout: <NAME> | Caps: ON/OFF | Shift: ON/OFF`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub layout_name: String,
    pub caps_lock: bool,
    pub shift: bool,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout: {} | Caps: {} | Shift: {}",
            self.layout_name,
            on_off(self.caps_lock),
            on_off(self.shift)
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Fingertip distance of one hand hovering a key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PinchReadout {
    /// Index of the hand in the frame's detection order.
    pub hand: usize,
    pub distance: f32,
    /// Where the readout is drawn: halfway between the two fingertips.
    pub midpoint: Point,
}

/// Line between the two wrists while they are inside the advisory range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdvisoryLine {
    pub from: Point,
    pub to: Point,
    pub distance: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub buttons: Vec<ButtonView>,
    /// Last `display_lines` lines of the wrapped text buffer.
    pub text_lines: Vec<String>,
    pub status: StatusLine,
    /// Empty unless `show_landmarks` is on.
    pub landmarks: Vec<Vec<Point>>,
    /// Empty unless `show_distance` is on.
    pub pinch_readouts: Vec<PinchReadout>,
    pub advisory: Option<AdvisoryLine>,
    /// Positions of keys clicked during the last frame, for click feedback.
    pub click_positions: Vec<Point>,
    pub theme: String,
}

/// Packs the whitespace-separated words of `text` into lines.
///
/// A word joins the current line while the line plus the word stays under
/// `width` characters; otherwise the line is closed.  A single word longer
/// than `width` gets a line of its own.  Newlines count as word separators.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = current.chars().count() + word.chars().count();
        if current.is_empty() || candidate < width {
            current.push_str(word);
            current.push(' ');
        } else {
            lines.push(current.trim_end().to_string());
            current = format!("{word} ");
        }
    }

    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

/// The last `count` lines of [`wrap_words`].
pub fn tail_lines(text: &str, width: usize, count: usize) -> Vec<String> {
    let mut lines = wrap_words(text, width);
    let skip = lines.len().saturating_sub(count);
    lines.drain(..skip);
    lines
}
