//! Leap quasimode key handling.
//!
//! Pressing a Leap key starts a session (normal keymap); while it is held the
//! opposite Leap key begins selection and releasing it commits. Printable keys
//! are appended on key-down because some hosts withhold text events while a
//! modifier is held; the text event that may still follow is suppressed.

use super::{DispatchResult, InputDispatcher};
use core_events::{KeyCode, KeyEvent};
use core_state::{Editor, LeapSource};
use core_text::Direction;
use tracing::trace;

fn leap_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::LeapForward => Some(Direction::Forward),
        KeyCode::LeapBackward => Some(Direction::Backward),
        _ => None,
    }
}

impl InputDispatcher {
    pub(super) fn leap_key(&mut self, editor: &mut Editor, key: &KeyEvent) -> DispatchResult {
        match key.code {
            KeyCode::Esc => editor.leap_cancel(),
            KeyCode::Backspace => {
                if !editor.leap_backspace() {
                    return DispatchResult::clean();
                }
            }
            KeyCode::Enter => editor.leap_end_commit(),
            code if code.is_leap() => {
                if leap_direction(code) == Some(editor.leap().direction) {
                    return DispatchResult::clean();
                }
                editor.begin_leap_selection();
            }
            _ => {
                let Some(c) = key.fallback_char() else {
                    trace!(target: "actions.dispatch", key = %key, "leap_key_ignored");
                    return DispatchResult::clean();
                };
                editor.leap_append(c.encode_utf8(&mut [0; 4]), LeapSource::KeyDown);
                self.suppress_text = Some(c);
            }
        }
        DispatchResult::dirty()
    }

    /// Releasing the session's Leap key commits it. Other key-ups are ignored.
    pub(super) fn leap_key_up(&mut self, editor: &mut Editor, key: &KeyEvent) -> DispatchResult {
        let leap = editor.leap();
        if leap.is_active() && leap_direction(key.code) == Some(leap.direction) {
            editor.leap_end_commit();
            return DispatchResult::dirty();
        }
        DispatchResult::clean()
    }
}
