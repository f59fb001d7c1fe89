//! Label classification.
//!
//! Every key label is classified exactly once, when its button is generated,
//! into a [`KeyAction`] and a [`SizeClass`].  Nothing downstream compares
//! label strings again.

use serde::{Deserialize, Serialize};

/// Label drawn on the backspace key.
pub const BACKSPACE_GLYPH: &str = "⌫";

/// Spelled-out backspace label, accepted so custom layouts written in TOML
/// need not contain the glyph.  A custom key labelled `Backspace` erases; it
/// never types the word.
pub const BACKSPACE_WORD: &str = "Backspace";

/// Number of spaces a `Tab` key appends.
pub const TAB_WIDTH: usize = 4;

/// Modifier keys that can be clicked but have no effect yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Ctrl,
    Alt,
    Win,
    Menu,
}

impl ModifierKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Alt => "Alt",
            Self::Win => "Win",
            Self::Menu => "Menu",
        }
    }
}

/// What clicking a key does to the keyboard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    /// Remove the last character of the text buffer.
    Backspace,
    /// Append a single space.
    Space,
    /// Append a newline and commit the buffer to history.
    Enter,
    /// Toggle caps lock.
    CapsLock,
    /// Toggle shift.
    Shift,
    /// Append [`TAB_WIDTH`] spaces.
    Tab,
    /// Reserved modifier; no effect on the buffer.
    Modifier(ModifierKey),
    /// Append the case-folded label and forward it to the input sink.
    Text(String),
}

impl KeyAction {
    /// Classifies a key label.  Total: every label maps to some action.
    ///
    /// Both [`BACKSPACE_GLYPH`] and [`BACKSPACE_WORD`] classify as
    /// [`KeyAction::Backspace`].
    pub fn classify(label: &str) -> Self {
        match label {
            BACKSPACE_GLYPH | BACKSPACE_WORD => Self::Backspace,
            "Space" => Self::Space,
            "Enter" => Self::Enter,
            "Caps" => Self::CapsLock,
            "Shift" => Self::Shift,
            "Tab" => Self::Tab,
            "Ctrl" => Self::Modifier(ModifierKey::Ctrl),
            "Alt" => Self::Modifier(ModifierKey::Alt),
            "Win" => Self::Modifier(ModifierKey::Win),
            "Menu" => Self::Modifier(ModifierKey::Menu),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Rendering size class of a key, derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    /// Single glyphs: 85 × 85.
    Standard,
    /// `Space`: 200 × 85.
    Wide,
    /// `Enter`, `Shift`, `Caps`, `Tab`: 120 × 85.
    Medium,
    /// `Ctrl`, `Alt`, `Win`, `Menu`: 100 × 85.
    Narrow,
}

impl SizeClass {
    /// Key height shared by every size class.
    pub const KEY_HEIGHT: f32 = 85.0;

    pub fn of(label: &str) -> Self {
        match label {
            "Space" => Self::Wide,
            "Enter" | "Shift" | "Caps" | "Tab" => Self::Medium,
            "Ctrl" | "Alt" | "Win" | "Menu" => Self::Narrow,
            _ => Self::Standard,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            Self::Standard => 85.0,
            Self::Wide => 200.0,
            Self::Medium => 120.0,
            Self::Narrow => 100.0,
        }
    }

    pub fn height(&self) -> f32 {
        Self::KEY_HEIGHT
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
