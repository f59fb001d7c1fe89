//! Per-frame hover and press flags.
//!
//! Buttons themselves are immutable.  Whether a button is hovered or pressed
//! in the current frame lives here instead, keyed by [`ButtonId`], and is
//! cleared at the start of every pass.

use std::collections::BTreeSet;

use super::layout::ButtonId;

/// Transient flags for the current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonOverlay {
    hovered: BTreeSet<ButtonId>,
    pressed: BTreeSet<ButtonId>,
}

impl ButtonOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every flag.  Called at the start of each frame and whenever the
    /// button set is regenerated.
    pub fn clear(&mut self) {
        self.hovered.clear();
        self.pressed.clear();
    }

    pub fn mark_hovered(&mut self, id: ButtonId) {
        self.hovered.insert(id);
    }

    pub fn mark_pressed(&mut self, id: ButtonId) {
        self.pressed.insert(id);
    }

    pub fn is_hovered(&self, id: ButtonId) -> bool {
        self.hovered.contains(&id)
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.pressed.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.hovered.is_empty() && self.pressed.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
