//! Command prefix: a bare `Esc` arms a one-shot command letter.
//!
//! Each arm bumps the arm generation and schedules the help callback with that
//! token. A callback only shows help if its token is still the current one and
//! the prefix is still armed, so timers from earlier arms are inert.

use super::{DispatchResult, InputDispatcher, InputMode};
use crate::Action;
use crate::keymap;
use core_events::{ArmToken, KeyCode, KeyEvent};
use core_state::Editor;
use tracing::{debug, trace};

impl InputDispatcher {
    pub(super) fn arm_prefix(&mut self) -> DispatchResult {
        self.arm_generation = self.arm_generation.next();
        let token = self.arm_generation;
        self.help_visible = false;
        self.set_mode(InputMode::CommandPrefix { token });
        self.scheduler.schedule_after(self.config.help_delay, token);
        debug!(target: "actions.mode", token = token.0, "prefix_armed");
        DispatchResult::dirty()
    }

    pub(super) fn disarm_prefix(&mut self) {
        self.help_visible = false;
        self.set_mode(InputMode::Idle);
    }

    /// Resolve the key following an armed prefix. `None` hands non-letter keys
    /// (arrows, chords) back to normal handling after disarming.
    pub(super) fn prefix_key(&mut self, editor: &mut Editor, key: &KeyEvent) -> Option<DispatchResult> {
        self.disarm_prefix();
        if key.code == KeyCode::Esc {
            return Some(self.apply(Action::CloseBuffer, editor));
        }
        let Some(c) = key.text_char() else {
            trace!(target: "actions.dispatch", key = %key, "prefix_disarmed_by_key");
            return None;
        };
        self.suppress_text = Some(c);
        Some(self.prefix_char(editor, c))
    }

    /// Run the prefix command bound to `c`. The prefix must already be disarmed.
    pub(super) fn prefix_char(&mut self, editor: &mut Editor, c: char) -> DispatchResult {
        match c {
            ' ' => {
                self.set_mode(InputMode::Less);
                DispatchResult::dirty()
            }
            'x' => {
                let line = editor.caret_line();
                self.enter_line_highlight(editor, line)
            }
            '/' => self.enter_search(editor),
            c => match keymap::prefix_command(c) {
                Some(action) => {
                    debug!(target: "actions.dispatch", key = %c, ?action, "prefix_command");
                    self.apply(action, editor).or(DispatchResult::dirty())
                }
                None => {
                    trace!(target: "actions.dispatch", key = %c, "prefix_unbound");
                    DispatchResult::dirty()
                }
            },
        }
    }

    /// Delayed help callback. Shows help only for the current, still-armed token.
    pub fn on_help_timer(&mut self, token: ArmToken) -> DispatchResult {
        match self.mode {
            InputMode::CommandPrefix { token: armed } if armed == token => {
                if self.help_visible {
                    return DispatchResult::clean();
                }
                self.help_visible = true;
                debug!(target: "actions.mode", token = token.0, "prefix_help_shown");
                DispatchResult::dirty()
            }
            _ => {
                trace!(target: "actions.mode", token = token.0, current = self.arm_generation.0, "help_timer_stale");
                DispatchResult::clean()
            }
        }
    }
}
