//! Transient input modes.
//!
//! Exactly one of command prefix, search, line highlight or less can be live at
//! a time, so they share one enum. The popup and the Leap session are tracked
//! separately (popup on the dispatcher, Leap inside the editor) because both can
//! coexist with `Idle`.

use core_events::ArmToken;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Idle,
    /// A bare `Escape` armed a one-shot command letter.
    CommandPrefix { token: ArmToken },
    Search(SearchState),
    /// Whole-line selection from `anchor_line` to `to_line` (either order).
    LineHighlight { anchor_line: usize, to_line: usize },
    Less,
}

/// Data-free discriminant of [`InputMode`], for observers and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Idle,
    CommandPrefix,
    Search,
    LineHighlight,
    Less,
}

impl InputMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            InputMode::Idle => ModeKind::Idle,
            InputMode::CommandPrefix { .. } => ModeKind::CommandPrefix,
            InputMode::Search(_) => ModeKind::Search,
            InputMode::LineHighlight { .. } => ModeKind::LineHighlight,
            InputMode::Less => ModeKind::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: Vec<char>,
    pub locked: bool,
    pub origin_caret: usize,
    pub current_match: Option<usize>,
}

impl SearchState {
    pub fn new(origin_caret: usize) -> Self {
        Self {
            origin_caret,
            ..Self::default()
        }
    }

    /// Locked onto an actual match: Tab stepping and `x` are live.
    pub fn has_locked_match(&self) -> bool {
        self.locked && self.current_match.is_some()
    }

    pub fn query_string(&self) -> String {
        self.query.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// Command-prefix key table.
    Help,
    /// Host-supplied symbol/info content.
    Info,
}

/// Scrollable overlay owned by the host renderer; the dispatcher only tracks scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popup {
    pub kind: PopupKind,
    pub line_count: usize,
    pub scroll: usize,
}

impl Popup {
    pub fn new(kind: PopupKind, line_count: usize) -> Self {
        Self {
            kind,
            line_count,
            scroll: 0,
        }
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.line_count.saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    pub fn scroll_to(&mut self, end: bool) {
        self.scroll = if end {
            self.line_count.saturating_sub(1)
        } else {
            0
        };
    }
}
