//! Out-of-band control commands.
//!
//! Besides gestures, the loop accepts four commands from the operator.  Each
//! has a word form and the single-key binding used by the on-screen window:
//!
//! | Command        | Word           | Key |
//! |----------------|----------------|-----|
//! | quit           | `quit`         | `q` |
//! | save           | `save`         | `s` |
//! | cycle layout   | `cycle-layout` | `l` |
//! | clear          | `clear`        | `c` |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A command that changes loop state outside the gesture pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    /// Stop the loop after the current pass.
    Quit,
    /// Write the text buffer to the configured output file.
    Save,
    /// Advance to the next layout, as the two-hand gesture does.
    CycleLayout,
    /// Empty the text buffer.  History is kept.
    Clear,
}

/// Returned when a line of input names no known command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown control command: {0:?}")]
pub struct ControlParseError(pub String);

impl ControlCommand {
    /// Canonical word form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Save => "save",
            Self::CycleLayout => "cycle-layout",
            Self::Clear => "clear",
        }
    }

    /// Maps a single-key binding to its command.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' => Some(Self::Quit),
            's' => Some(Self::Save),
            'l' => Some(Self::CycleLayout),
            'c' => Some(Self::Clear),
            _ => None,
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCommand {
    type Err = ControlParseError;

    /// Accepts the word form (case-insensitive) or the single-key binding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if let Some(cmd) = Self::from_key(key) {
                return Ok(cmd);
            }
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "quit" => Ok(Self::Quit),
            "save" => Ok(Self::Save),
            "cycle-layout" => Ok(Self::CycleLayout),
            "clear" => Ok(Self::Clear),
            _ => Err(ControlParseError(trimmed.to_string())),
        }
    }
}
