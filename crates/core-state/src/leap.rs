//! Leap quasimode: anchored incremental search used as navigation.
//!
//! `Idle -> Active(dir) -> [Selecting] -> Committed | Cancelled -> Idle`
//!
//! While active every query change re-searches from the *origin* caret (with wrap),
//! so typing refines one jump instead of stepping through matches. Leap Again is
//! the stepping variant: it starts one rune past the caret (forward) or strictly
//! before it (backward) using the last committed query.

use crate::{Editor, Selection};
use core_text::{Direction, find_in_dir};
use tracing::{debug, trace};

/// Which input path delivered the latest query rune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeapSource {
    #[default]
    TextInput,
    KeyDown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeapState {
    pub active: bool,
    pub direction: Direction,
    pub query: Vec<char>,
    pub origin_caret: usize,
    pub last_found: Option<usize>,
    pub selecting: bool,
    pub selection_anchor: usize,
    pub last_src: LeapSource,
    pub last_committed_query: Vec<char>,
}

impl LeapState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query_string(&self) -> String {
        self.query.iter().collect()
    }

    pub fn last_committed_string(&self) -> String {
        self.last_committed_query.iter().collect()
    }

    /// Drop the live session. The last committed query is kept.
    pub(crate) fn reset_session(&mut self) {
        let committed = std::mem::take(&mut self.last_committed_query);
        *self = Self {
            last_committed_query: committed,
            ..Self::default()
        };
    }
}

impl Editor {
    /// Enter the quasimode at the current caret. An existing selection is left alone.
    pub fn leap_start(&mut self, dir: Direction) {
        self.leap.reset_session();
        self.leap.active = true;
        self.leap.direction = dir;
        self.leap.origin_caret = self.caret;
        debug!(target: "state.leap", ?dir, origin = self.caret, "leap_start");
    }

    /// Append `text` to the query and re-search. No-op outside a session.
    pub fn leap_append(&mut self, text: &str, src: LeapSource) -> bool {
        if !self.leap.active || text.is_empty() {
            return false;
        }
        self.leap.query.extend(text.chars());
        self.leap.last_src = src;
        self.leap_search();
        true
    }

    /// Pop one query rune and re-search.
    pub fn leap_backspace(&mut self) -> bool {
        if !self.leap.active || self.leap.query.pop().is_none() {
            return false;
        }
        self.leap_search();
        true
    }

    fn leap_search(&mut self) {
        if self.leap.query.is_empty() {
            self.caret = self.leap.origin_caret;
            self.leap.last_found = None;
        } else {
            let hay = self.buffer.all_runes();
            let found = find_in_dir(
                &hay,
                &self.leap.query,
                self.leap.origin_caret,
                self.leap.direction,
                true,
            );
            if let Some(pos) = found {
                self.caret = pos;
            }
            self.leap.last_found = found;
        }
        if self.leap.selecting {
            self.selection.b = self.caret;
        }
        trace!(target: "state.leap", query = %self.leap.query_string(), caret = self.caret, found = ?self.leap.last_found, "leap_search");
    }

    /// Start extending a selection from the caret reached so far. Idempotent.
    pub fn begin_leap_selection(&mut self) {
        if !self.leap.active || self.leap.selecting {
            return;
        }
        self.leap.selecting = true;
        self.leap.selection_anchor = self.caret;
        self.selection = Selection::new(self.caret, self.caret);
        debug!(target: "state.leap", anchor = self.caret, "leap_selection_begin");
    }

    /// End the session leaving caret and selection where they are.
    pub fn leap_end_commit(&mut self) {
        if !self.leap.active {
            return;
        }
        if !self.leap.query.is_empty() {
            self.leap.last_committed_query = self.leap.query.clone();
        }
        debug!(target: "state.leap", query = %self.leap.query_string(), caret = self.caret, "leap_commit");
        self.leap.reset_session();
    }

    /// End the session restoring the origin caret. A selection begun in this
    /// session is deactivated.
    pub fn leap_cancel(&mut self) {
        if !self.leap.active {
            return;
        }
        self.caret = self.leap.origin_caret.min(self.buffer.len());
        if self.leap.selecting {
            self.selection.active = false;
        }
        debug!(target: "state.leap", origin = self.caret, "leap_cancel");
        self.leap.reset_session();
    }

    /// Jump to the next occurrence of the last committed query in `dir`, wrapping.
    /// Moves the caret only.
    pub fn leap_again(&mut self, dir: Direction) -> bool {
        if self.leap.last_committed_query.is_empty() {
            return false;
        }
        let hay = self.buffer.all_runes();
        let start = match dir {
            Direction::Forward => self.caret + 1,
            Direction::Backward => self.caret,
        };
        match find_in_dir(&hay, &self.leap.last_committed_query, start, dir, true) {
            Some(pos) => {
                self.caret = pos;
                debug!(target: "state.leap", ?dir, caret = pos, "leap_again");
                true
            }
            None => false,
        }
    }
}
