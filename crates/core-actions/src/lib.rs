//! Action model, key bindings and the mode-resolving input dispatcher.
//!
//! Raw key/text events enter [`InputDispatcher`], which resolves the active
//! transient mode (help popup, command prefix, search, line highlight, less,
//! Leap) and either updates its own mode state or emits an [`Action`] that
//! [`dispatch`] applies to a `core_state::Editor`.

use core_text::Direction;

pub mod dispatcher;
pub mod keymap;

pub use dispatcher::{
    DispatchResult, DispatcherConfig, DispatcherSnapshot, InputDispatcher, InputMode, ModeKind,
    Popup, PopupKind, SearchState, dispatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertText(String),
    InsertNewline,
    Backspace,
    DeleteForward,
    DeleteWord,
    DeleteLine,
    KillToLineEnd,
}

/// Editor-level operation resolved from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion { kind: MotionKind, extend: bool },
    Edit(EditKind),
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    LeapStart(Direction),
    LeapAgain(Direction),
    /// Open the command-prefix help popup. Resolved by the dispatcher itself.
    ShowHelp,
    CloseBuffer,
    Quit,
}

impl Action {
    pub fn motion(kind: MotionKind) -> Self {
        Action::Motion {
            kind,
            extend: false,
        }
    }
}

/// Hook for hosts that want to watch resolved actions and mode transitions
/// (verbose logging, status lines). Both methods default to no-ops.
pub trait DispatchObserver {
    fn on_action(&self, _action: &Action) {}
    fn on_mode_change(&self, _from: ModeKind, _to: ModeKind) {}
}
