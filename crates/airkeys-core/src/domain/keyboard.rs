//! Keyboard state and action resolution.
//!
//! [`KeyboardState`] owns everything a click can change: the text buffer,
//! the committed-line history, the caps-lock and shift toggles, and the id
//! of the active layout.  [`KeyboardState::apply`] is total: every action is
//! valid in every state, and the worst outcome is a no-op.

use tracing::debug;

use super::action::{KeyAction, ModifierKey, TAB_WIDTH};
use super::layout::LayoutId;

/// What a resolved action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Backspace; `removed` is `None` when the buffer was already empty.
    Erased { removed: Option<char> },
    /// Whitespace appended by `Space` or `Tab`.
    Inserted { text: String },
    /// `Enter`: newline appended and buffer snapshot pushed to history.
    Committed,
    /// Caps lock toggled to the contained value.
    CapsLock(bool),
    /// Shift toggled to the contained value.
    Shift(bool),
    /// Reserved modifier clicked; nothing changed.
    Ignored(ModifierKey),
    /// Case-folded text appended; this is the only outcome forwarded to the
    /// input-injection sink.
    Typed { text: String },
}

impl KeyOutcome {
    /// Text to forward to the input-injection sink, if any.
    pub fn injection(&self) -> Option<&str> {
        match self {
            Self::Typed { text } => Some(text),
            _ => None,
        }
    }
}

/// The mutable keyboard state.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardState {
    text_buffer: String,
    history: Vec<String>,
    caps_lock: bool,
    shift: bool,
    active_layout: LayoutId,
}

impl KeyboardState {
    /// Creates an empty state with `active_layout` selected.
    pub fn new(active_layout: LayoutId) -> Self {
        Self {
            text_buffer: String::new(),
            history: Vec::new(),
            caps_lock: false,
            shift: false,
            active_layout,
        }
    }

    pub fn text(&self) -> &str {
        &self.text_buffer
    }

    /// Buffer snapshots taken at each `Enter`, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn active_layout(&self) -> &LayoutId {
        &self.active_layout
    }

    pub fn set_active_layout(&mut self, layout: LayoutId) {
        self.active_layout = layout;
    }

    /// Empties the text buffer.  History, modifiers, and layout are kept.
    pub fn clear(&mut self) {
        self.text_buffer.clear();
        debug!("text buffer cleared");
    }

    /// Folds `label` to upper case when caps lock or shift is on, lower case
    /// otherwise.
    ///
    /// Both toggles force upper case and neither is released after typing.
    pub fn fold(&self, label: &str) -> String {
        if self.caps_lock || self.shift {
            label.to_uppercase()
        } else {
            label.to_lowercase()
        }
    }

    /// Applies a clicked key's action and reports what changed.
    pub fn apply(&mut self, action: &KeyAction) -> KeyOutcome {
        let outcome = match action {
            KeyAction::Backspace => KeyOutcome::Erased {
                removed: self.text_buffer.pop(),
            },
            KeyAction::Space => self.insert(" ".to_string()),
            KeyAction::Enter => {
                self.text_buffer.push('\n');
                self.history.push(self.text_buffer.clone());
                KeyOutcome::Committed
            }
            KeyAction::CapsLock => {
                self.caps_lock = !self.caps_lock;
                KeyOutcome::CapsLock(self.caps_lock)
            }
            KeyAction::Shift => {
                self.shift = !self.shift;
                KeyOutcome::Shift(self.shift)
            }
            KeyAction::Tab => self.insert(" ".repeat(TAB_WIDTH)),
            KeyAction::Modifier(key) => KeyOutcome::Ignored(*key),
            KeyAction::Text(label) => {
                let text = self.fold(label);
                self.text_buffer.push_str(&text);
                KeyOutcome::Typed { text }
            }
        };
        debug!(?action, ?outcome, "key action applied");
        outcome
    }

    fn insert(&mut self, text: String) -> KeyOutcome {
        self.text_buffer.push_str(&text);
        KeyOutcome::Inserted { text }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
