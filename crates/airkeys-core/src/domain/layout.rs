//! Key layouts and generated button geometry.
//!
//! A [`Layout`] is a named grid of key labels.  The [`LayoutRegistry`] keeps
//! every known layout in a fixed cyclic order and turns the active one into a
//! [`ButtonSet`]: immutable buttons with frame-space rectangles, packed row by
//! row so that no two buttons overlap.
//!
//! Button sets are never patched in place.  Switching layouts throws the old
//! set away and generates a fresh one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::action::{KeyAction, SizeClass, BACKSPACE_GLYPH};
use super::geometry::{Point, Rect};

/// Identifier of a layout, e.g. `"qwerty"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(String);

impl LayoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayoutId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Errors that can occur when registering or generating layouts.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// No layout with this identifier is registered.
    #[error("unknown layout: {0}")]
    UnknownLayout(LayoutId),

    /// A layout contains an empty key label.
    #[error("layout {layout} has an empty label at row {row}, column {column}")]
    EmptyLabel {
        layout: LayoutId,
        row: usize,
        column: usize,
    },

    /// A layout has no keys at all.
    #[error("layout {0} has no keys")]
    EmptyLayout(LayoutId),

    /// A layout with this identifier is already registered.
    #[error("layout {0} is already registered")]
    DuplicateLayout(LayoutId),
}

/// A named grid of key labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: LayoutId,
    /// Display name shown in the status line (e.g. `"QWERTY"`).
    pub name: String,
    /// Rows top to bottom, each row left to right.
    pub rows: Vec<Vec<String>>,
}

impl Layout {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rows: &[&[&str]]) -> Self {
        Self {
            id: LayoutId::new(id),
            name: name.into(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| label.to_string()).collect())
                .collect(),
        }
    }

    /// Total number of keys across all rows.
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.key_count() == 0 {
            return Err(LayoutError::EmptyLayout(self.id.clone()));
        }
        for (row, labels) in self.rows.iter().enumerate() {
            if let Some(column) = labels.iter().position(|label| label.is_empty()) {
                return Err(LayoutError::EmptyLabel {
                    layout: self.id.clone(),
                    row,
                    column,
                });
            }
        }
        Ok(())
    }

    /// Full alphanumeric layout.
    pub fn qwerty() -> Self {
        Self::new(
            "qwerty",
            "QWERTY",
            &[
                &["`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", BACKSPACE_GLYPH],
                &["Tab", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "\\"],
                &["Caps", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'", "Enter"],
                &["Shift", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "Shift"],
                &["Ctrl", "Win", "Alt", "Space", "Alt", "Win", "Menu", "Ctrl"],
            ],
        )
    }

    /// Numeric pad.
    pub fn numeric() -> Self {
        Self::new(
            "numeric",
            "NUMERIC",
            &[
                &["7", "8", "9", "/"],
                &["4", "5", "6", "*"],
                &["1", "2", "3", "-"],
                &["0", ".", "=", "+"],
            ],
        )
    }

    /// Symbol set.
    pub fn symbols() -> Self {
        Self::new(
            "symbols",
            "SYMBOLS",
            &[
                &["!", "@", "#", "$", "%", "^", "&", "*", "(", ")", "_", "+", BACKSPACE_GLYPH],
                &["Tab", "~", "`", "|", "\\", "{", "}", "[", "]", ":", ";", "'", "Enter"],
                &["Caps", "<", ">", "?", "/", "=", "+", "-", "*", "&", "|", "Enter"],
                &["Shift", "Space", "Space", "Space", "Space", "Space", "Space", "Shift"],
            ],
        )
    }
}

/// Grid constants used to place generated buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// X of the first key in every row.
    pub origin_x: f32,
    /// Y of the first row.
    pub origin_y: f32,
    /// Horizontal gap between neighbouring keys.  With standard keys the
    /// column pitch is `85 + column_gap`.
    pub column_gap: f32,
    /// Vertical distance between the tops of consecutive rows.
    pub row_pitch: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 50.0,
            column_gap: 15.0,
            row_pitch: 100.0,
        }
    }
}

/// Identity of a button within one generated [`ButtonSet`]: its position in
/// generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ButtonId(pub usize);

/// One generated key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub id: ButtonId,
    pub label: String,
    pub rect: Rect,
    pub size_class: SizeClass,
    /// Action resolved from the label at generation time.
    pub action: KeyAction,
    /// Grid coordinates the key came from.
    pub row: usize,
    pub column: usize,
}

impl Button {
    /// Top-left corner, where click feedback is anchored.
    pub fn position(&self) -> Point {
        Point::new(self.rect.x, self.rect.y)
    }
}

/// The immutable button set generated from one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSet {
    layout_id: LayoutId,
    buttons: Vec<Button>,
}

impl ButtonSet {
    /// Layout these buttons were generated from.
    pub fn layout_id(&self) -> &LayoutId {
        &self.layout_id
    }

    /// Buttons in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter()
    }

    pub fn get(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Returns the first button, in generation order, whose rectangle
    /// contains `point`.
    ///
    /// Generated sets never overlap, so the first match is also the only one.
    pub fn hit_test(&self, point: Point) -> Option<&Button> {
        self.buttons.iter().find(|b| b.rect.contains(point))
    }
}

/// Ordered collection of layouts.
///
/// The registration order is the cycling order.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: Vec<Layout>,
    metrics: GridMetrics,
}

impl LayoutRegistry {
    /// Creates an empty registry.
    pub fn new(metrics: GridMetrics) -> Self {
        Self {
            layouts: Vec::new(),
            metrics,
        }
    }

    /// Creates a registry holding the built-in layouts in the order
    /// `qwerty`, `numeric`, `symbols`.
    pub fn with_builtin(metrics: GridMetrics) -> Self {
        Self {
            layouts: vec![Layout::qwerty(), Layout::numeric(), Layout::symbols()],
            metrics,
        }
    }

    /// Appends a layout at the end of the cycling order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateLayout`] if the id is taken,
    /// [`LayoutError::EmptyLayout`] if it has no keys, and
    /// [`LayoutError::EmptyLabel`] if any label is the empty string.
    pub fn register(&mut self, layout: Layout) -> Result<(), LayoutError> {
        if self.contains(&layout.id) {
            return Err(LayoutError::DuplicateLayout(layout.id));
        }
        layout.validate()?;
        debug!(layout = %layout.id, keys = layout.key_count(), "registered layout");
        self.layouts.push(layout);
        Ok(())
    }

    /// Layout identifiers in cycling order.
    pub fn layouts(&self) -> impl Iterator<Item = &LayoutId> {
        self.layouts.iter().map(|l| &l.id)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn contains(&self, id: &LayoutId) -> bool {
        self.layouts.iter().any(|l| &l.id == id)
    }

    pub fn get(&self, id: &LayoutId) -> Option<&Layout> {
        self.layouts.iter().find(|l| &l.id == id)
    }

    /// Returns the identifier after `current`, wrapping around at the end.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownLayout`] if `current` is not registered.
    pub fn cycle(&self, current: &LayoutId) -> Result<&LayoutId, LayoutError> {
        let index = self
            .layouts
            .iter()
            .position(|l| &l.id == current)
            .ok_or_else(|| LayoutError::UnknownLayout(current.clone()))?;
        Ok(&self.layouts[(index + 1) % self.layouts.len()].id)
    }

    /// Generates the button set for layout `id`.
    ///
    /// Keys are packed left to right: each key starts `column_gap` after the
    /// right edge of its left neighbour, and rows start `row_pitch` apart.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownLayout`] if `id` is not registered.
    pub fn generate(&self, id: &LayoutId) -> Result<ButtonSet, LayoutError> {
        let layout = self
            .get(id)
            .ok_or_else(|| LayoutError::UnknownLayout(id.clone()))?;
        let m = self.metrics;

        let mut buttons = Vec::with_capacity(layout.key_count());
        for (row, labels) in layout.rows.iter().enumerate() {
            let y = m.origin_y + row as f32 * m.row_pitch;
            let mut x = m.origin_x;
            for (column, label) in labels.iter().enumerate() {
                let size_class = SizeClass::of(label);
                let rect = Rect::new(x, y, size_class.width(), size_class.height());
                x = rect.right() + m.column_gap;
                buttons.push(Button {
                    id: ButtonId(buttons.len()),
                    label: label.clone(),
                    rect,
                    size_class,
                    action: KeyAction::classify(label),
                    row,
                    column,
                });
            }
        }

        Ok(ButtonSet {
            layout_id: layout.id.clone(),
            buttons,
        })
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::with_builtin(GridMetrics::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
