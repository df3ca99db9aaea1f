use crate::Selection;
use std::collections::VecDeque;
use tracing::trace;

/// Default bound on retained undo snapshots.
pub const UNDO_HISTORY_MAX: usize = 256;

/// Immutable full-state snapshot: buffer contents, caret and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    runes: Vec<char>,
    caret: usize,
    selection: Selection,
}

impl UndoEntry {
    pub fn new(runes: Vec<char>, caret: usize, selection: Selection) -> Self {
        Self {
            runes,
            caret,
            selection,
        }
    }

    pub fn runes(&self) -> &[char] {
        &self.runes
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }
}

/// Bounded LIFO of snapshots plus a redo stack cleared on every fresh push.
#[derive(Debug)]
pub struct UndoStack {
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_HISTORY_MAX)
    }

    /// Stack holding at most `capacity` entries (minimum 1); the oldest is dropped on overflow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record the pre-mutation state. Invalidates redo history.
    pub fn push(&mut self, entry: UndoEntry) {
        self.push_bounded(entry);
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    fn push_bounded(&mut self, entry: UndoEntry) {
        let len = entry.runes.len();
        self.undo_stack.push_back(entry);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), len, "push_snapshot");
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
    }

    /// Pop the newest snapshot; `current` (the state being replaced) moves to the redo stack.
    pub fn undo(&mut self, current: UndoEntry) -> Option<UndoEntry> {
        let last = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        Some(last)
    }

    /// Pop the newest redo snapshot; `current` moves back onto the undo stack.
    pub fn redo(&mut self, current: UndoEntry) -> Option<UndoEntry> {
        let next = self.redo_stack.pop()?;
        self.push_bounded(current);
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        Some(next)
    }
}
