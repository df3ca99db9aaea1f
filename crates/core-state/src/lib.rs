//! Editor state: one gap buffer, caret, selection, Leap session and undo history.
//!
//! Scope:
//! - Every mutating operation records exactly one [`UndoEntry`] *before* it touches
//!   the buffer, including compound edits (replace-selection-then-insert is one step).
//!   Operations that end up changing nothing record nothing.
//! - Offsets are rune indices. Callers may pass any value; everything clamps.
//! - Leap quasimode state lives in [`leap`], caret motions in [`motion`], the
//!   injected clipboard capability in [`clipboard`].
//!
//! Undo/redo restore buffer, caret and selection verbatim and clear all Leap
//! state, the last committed query included. With nothing to undo or redo they
//! change nothing at all.

use core_text::TextBuffer;
use core_text::word::{is_space_rune, is_word_rune};
use std::fmt;
use tracing::{debug, trace};

pub mod clipboard;
pub mod leap;
pub mod motion;
pub mod undo;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use leap::{LeapSource, LeapState};
pub use undo::{UNDO_HISTORY_MAX, UndoEntry, UndoStack};

/// Selection endpoints. `a` is the anchor, `b` the moving end; they are unordered.
/// An active selection with `a == b` is treated as empty wherever it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub active: bool,
    pub a: usize,
    pub b: usize,
}

impl Selection {
    /// Active selection from anchor `a` to moving end `b`.
    pub fn new(a: usize, b: usize) -> Self {
        Self { active: true, a, b }
    }

    /// `(min, max)` of the two endpoints.
    pub fn normalize(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }

    /// Normalized range when the selection is active and non-empty.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.active && self.a != self.b {
            Some(self.normalize())
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct Editor {
    buffer: TextBuffer,
    caret: usize,
    selection: Selection,
    leap: LeapState,
    undo: UndoStack,
    clipboard: Box<dyn Clipboard>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("buffer", &self.buffer)
            .field("caret", &self.caret)
            .field("selection", &self.selection)
            .field("leap", &self.leap)
            .field("undo_depth", &self.undo.undo_depth())
            .field("redo_depth", &self.undo.redo_depth())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::from_buffer(TextBuffer::new())
    }

    /// Editor over `content` with the caret at offset 0.
    pub fn from_text(content: &str) -> Self {
        Self::from_buffer(TextBuffer::from_text(content))
    }

    pub fn from_buffer(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            caret: 0,
            selection: Selection::default(),
            leap: LeapState::default(),
            undo: UndoStack::new(),
            clipboard: Box::new(MemoryClipboard::default()),
        }
    }

    /// Replace the undo history with an empty one bounded at `capacity`.
    pub fn with_undo_capacity(mut self, capacity: usize) -> Self {
        self.undo = UndoStack::with_capacity(capacity);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    // ---------------------------------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------------------------------

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }
    pub fn caret(&self) -> usize {
        self.caret
    }
    pub fn selection(&self) -> Selection {
        self.selection
    }
    pub fn leap(&self) -> &LeapState {
        &self.leap
    }
    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }
    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    /// Zero-based line holding the caret.
    pub fn caret_line(&self) -> usize {
        self.buffer.line_of(self.caret)
    }

    /// Selected text when a non-empty selection is active.
    pub fn selection_text(&self) -> Option<String> {
        let (s, e) = self.selection.range()?;
        Some(self.buffer.slice_string(s, e))
    }

    // ---------------------------------------------------------------------------------------------
    // Caret / selection setters (no undo)
    // ---------------------------------------------------------------------------------------------

    /// Place the caret (clamped). The selection is left untouched.
    pub fn set_caret(&mut self, pos: usize) {
        self.caret = pos.min(self.buffer.len());
    }

    /// Activate a selection from anchor `a` to moving end `b` (both clamped).
    pub fn set_selection(&mut self, a: usize, b: usize) {
        let len = self.buffer.len();
        self.selection = Selection::new(a.min(len), b.min(len));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select whole lines `from..=to` (either order). The block ends after the last
    /// line's newline when it has one; the caret moves to the block end.
    pub fn select_lines(&mut self, from_line: usize, to_line: usize) {
        let lo = from_line.min(to_line);
        let hi = from_line.max(to_line);
        let a = self.buffer.line_start_of(lo);
        let b = self.buffer.line_end_inclusive(hi);
        self.selection = Selection::new(a, b);
        self.caret = b;
        trace!(target: "state.edit", lo, hi, a, b, "select_lines");
    }

    // ---------------------------------------------------------------------------------------------
    // Undo plumbing
    // ---------------------------------------------------------------------------------------------

    /// Full copy of buffer, caret and selection.
    pub fn snapshot(&self) -> UndoEntry {
        UndoEntry::new(self.buffer.all_runes(), self.caret, self.selection)
    }

    fn restore(&mut self, entry: UndoEntry) {
        self.buffer = TextBuffer::from_runes(entry.runes());
        self.caret = entry.caret().min(self.buffer.len());
        self.selection = entry.selection();
    }

    /// Push the current state onto the undo stack. Called once per mutating operation.
    pub fn record_undo(&mut self) {
        let entry = self.snapshot();
        self.undo.push(entry);
    }

    /// Restore the newest snapshot and clear all Leap state, including the last
    /// committed query. Returns false (state untouched) on empty history.
    pub fn undo(&mut self) -> bool {
        if self.undo.undo_depth() == 0 {
            return false;
        }
        self.leap = LeapState::default();
        let current = self.snapshot();
        match self.undo.undo(current) {
            Some(entry) => {
                self.restore(entry);
                debug!(target: "state.undo", caret = self.caret, "undo_applied");
                true
            }
            None => false,
        }
    }

    /// Re-apply the newest undone state, clearing Leap state like [`undo`](Self::undo).
    /// Returns false (state untouched) on empty redo history.
    pub fn redo(&mut self) -> bool {
        if self.undo.redo_depth() == 0 {
            return false;
        }
        self.leap = LeapState::default();
        let current = self.snapshot();
        match self.undo.redo(current) {
            Some(entry) => {
                self.restore(entry);
                debug!(target: "state.undo", caret = self.caret, "redo_applied");
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------------------------------------

    /// Remove the active selection without recording undo. Caret lands at its start.
    fn take_selection(&mut self) -> bool {
        match self.selection.range() {
            Some((s, e)) => {
                self.buffer.delete(s, e);
                self.caret = s;
                self.selection.clear();
                true
            }
            None => {
                self.selection.clear();
                false
            }
        }
    }

    /// Insert `text` at the caret, replacing the selection if one is active.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let runes: Vec<char> = text.chars().collect();
        if runes.is_empty() {
            return false;
        }
        self.record_undo();
        self.take_selection();
        self.buffer.insert(self.caret, &runes);
        self.caret += runes.len();
        trace!(target: "state.edit", inserted = runes.len(), caret = self.caret, "insert_text");
        true
    }

    /// Insert `text` at `pos`. The caret (and selection endpoints) at or after `pos`
    /// shift right by the inserted length.
    pub fn insert_at(&mut self, pos: usize, text: &str) -> bool {
        let runes: Vec<char> = text.chars().collect();
        if runes.is_empty() {
            return false;
        }
        let pos = pos.min(self.buffer.len());
        self.record_undo();
        self.buffer.insert(pos, &runes);
        let n = runes.len();
        let shift = |x: usize| if x >= pos { x + n } else { x };
        self.caret = shift(self.caret);
        if self.selection.active {
            self.selection.a = shift(self.selection.a);
            self.selection.b = shift(self.selection.b);
        }
        trace!(target: "state.edit", pos, inserted = n, "insert_at");
        true
    }

    /// Delete the selection, else one rune before (`is_backspace`) or after the caret.
    pub fn backspace_or_delete_selection(&mut self, is_backspace: bool) -> bool {
        if self.selection.range().is_some() {
            self.record_undo();
            return self.take_selection();
        }
        self.selection.clear();
        if is_backspace {
            if self.caret == 0 {
                return false;
            }
            self.record_undo();
            self.buffer.delete(self.caret - 1, self.caret);
            self.caret -= 1;
        } else {
            if self.caret >= self.buffer.len() {
                return false;
            }
            self.record_undo();
            self.buffer.delete(self.caret, self.caret + 1);
        }
        true
    }

    /// Range removed by [`delete_word_at_caret`](Self::delete_word_at_caret).
    fn word_target(&self) -> Option<(usize, usize)> {
        let len = self.buffer.len();
        let is_word_at = |i: usize| self.buffer.rune_at(i).is_some_and(is_word_rune);
        let run_back = |mut s: usize| {
            while s > 0 && is_word_at(s - 1) {
                s -= 1;
            }
            s
        };
        if self.caret >= len {
            let mut end = len;
            while end > 0 && !is_word_at(end - 1) {
                end -= 1;
            }
            if end == 0 {
                return None;
            }
            return Some((run_back(end), end));
        }
        let c = self.buffer.rune_at(self.caret)?;
        if is_word_rune(c) {
            let mut e = self.caret;
            while e < len && is_word_at(e) {
                e += 1;
            }
            Some((run_back(self.caret), e))
        } else if is_space_rune(c) && self.caret > 0 && is_word_at(self.caret - 1) {
            Some((run_back(self.caret), self.caret))
        } else {
            Some((self.caret, self.caret + 1))
        }
    }

    /// Delete the word (letters, digits, underscore) touching the caret.
    ///
    /// * caret on a word rune: the whole run around it;
    /// * caret on whitespace right after a word: that preceding word;
    /// * caret on any other non-word rune: just that rune;
    /// * caret at buffer end: the last word, skipping trailing non-word runes.
    pub fn delete_word_at_caret(&mut self) -> bool {
        let Some((s, e)) = self.word_target() else {
            return false;
        };
        self.record_undo();
        self.buffer.delete(s, e);
        self.caret = s;
        self.selection.clear();
        trace!(target: "state.edit", s, e, "delete_word");
        true
    }

    /// Delete the caret's line with its trailing newline. On the last line only the
    /// line content goes; the newline ending the previous line stays.
    pub fn delete_line_at_caret(&mut self) -> bool {
        let s = self.buffer.line_start(self.caret);
        let mut e = self.buffer.line_end(self.caret);
        if e < self.buffer.len() {
            e += 1;
        }
        if e == s {
            return false;
        }
        self.record_undo();
        self.buffer.delete(s, e);
        self.caret = s;
        self.selection.clear();
        trace!(target: "state.edit", s, e, "delete_line");
        true
    }

    /// Delete from the caret to the end of its line, plus the newline when present.
    pub fn kill_to_line_end(&mut self) -> bool {
        if self.caret >= self.buffer.len() {
            return false;
        }
        let mut e = self.buffer.line_end(self.caret);
        if e < self.buffer.len() {
            e += 1;
        }
        self.record_undo();
        self.buffer.delete(self.caret, e);
        self.selection.clear();
        trace!(target: "state.edit", from = self.caret, to = e, "kill_to_line_end");
        true
    }
}
