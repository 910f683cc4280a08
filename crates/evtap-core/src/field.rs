#![forbid(unsafe_code)]

//! Observed text-field state.
//!
//! [`TextFieldState`] is a snapshot-plus-editor for the single text field
//! the inspector watches: its value, cursor, and selection. Positions are
//! grapheme indices, not bytes, so cursor arithmetic stays correct for
//! multi-byte and combining text.
//!
//! Inspection never faults: out-of-range positions clamp, and the cursor
//! and selection length degrade to sensible values instead of erroring.

use unicode_segmentation::UnicodeSegmentation;

/// Value, cursor, and selection of the watched text field.
///
/// Invariant: `selection_start <= selection_end <= grapheme_len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFieldState {
    value: String,
    /// Selection start (grapheme index). Equals the cursor position.
    selection_start: usize,
    /// Selection end (grapheme index). Equals start when nothing is selected.
    selection_end: usize,
}

impl TextFieldState {
    /// Create an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field with an initial value and the cursor at the end.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let len = value.graphemes(true).count();
        Self {
            value,
            selection_start: len,
            selection_end: len,
        }
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value length in graphemes.
    #[must_use]
    pub fn grapheme_len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    /// Caret position as a grapheme index.
    ///
    /// This is the selection start; with no selection it is the cursor
    /// itself. Always in `0..=grapheme_len()`.
    #[must_use]
    pub fn cursor_pos(&self) -> usize {
        self.selection_start
    }

    /// Number of selected graphemes (0 when nothing is selected).
    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.selection_end - self.selection_start
    }

    /// The selected text, possibly empty.
    #[must_use]
    pub fn selected_text(&self) -> &str {
        let start = self.byte_offset(self.selection_start);
        let end = self.byte_offset(self.selection_end);
        &self.value[start..end]
    }

    /// Set the selection range, clamping to the value and ordering the ends.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.grapheme_len();
        let a = start.min(len);
        let b = end.min(len);
        self.selection_start = a.min(b);
        self.selection_end = a.max(b);
    }

    /// Collapse the selection to a cursor at `pos` (clamped).
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    /// Select the whole value.
    pub fn select_all(&mut self) {
        self.selection_start = 0;
        self.selection_end = self.grapheme_len();
    }

    /// Insert text at the cursor, replacing any selection.
    ///
    /// The cursor lands after the inserted text.
    pub fn insert(&mut self, text: &str) {
        let start = self.byte_offset(self.selection_start);
        let end = self.byte_offset(self.selection_end);
        self.value.replace_range(start..end, text);
        let cursor = self.selection_start + text.graphemes(true).count();
        self.selection_start = cursor;
        self.selection_end = cursor;
    }

    /// Delete the selection, or the grapheme before the cursor.
    ///
    /// Returns true if anything was removed.
    pub fn backspace(&mut self) -> bool {
        if self.selection_len() > 0 {
            self.insert("");
            return true;
        }
        if self.selection_start == 0 {
            return false;
        }
        let start = self.byte_offset(self.selection_start - 1);
        let end = self.byte_offset(self.selection_start);
        self.value.replace_range(start..end, "");
        self.selection_start -= 1;
        self.selection_end = self.selection_start;
        true
    }

    /// Delete the selection, or the grapheme after the cursor.
    ///
    /// Returns true if anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.selection_len() > 0 {
            self.insert("");
            return true;
        }
        if self.selection_start >= self.grapheme_len() {
            return false;
        }
        let start = self.byte_offset(self.selection_start);
        let end = self.byte_offset(self.selection_start + 1);
        self.value.replace_range(start..end, "");
        true
    }

    /// Reset to an empty value.
    pub fn clear(&mut self) {
        self.value.clear();
        self.selection_start = 0;
        self.selection_end = 0;
    }

    /// Byte offset of the given grapheme index (clamped to the value's end).
    fn byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(offset, _)| offset)
    }
}
