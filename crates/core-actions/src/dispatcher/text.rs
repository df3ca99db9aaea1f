//! Text-insertion events.
//!
//! Order: suppression latch, empty/lone-tab filter, popup (ignored), armed
//! prefix (text resolves the command), search, line highlight, less (ignored),
//! Leap query, then typing with the double-space rule.
//!
//! Double space: a second space on the same line within the configured window,
//! right after a space, removes that space and puts a tab at the line start.
//! Both steps are ordinary undoable edits.

use super::{DispatchResult, InputDispatcher, InputMode};
use core_events::TextEvent;
use core_state::{Editor, LeapSource};
use tracing::{debug, trace};

impl InputDispatcher {
    pub fn handle_text(&mut self, editor: &mut Editor, event: &TextEvent) -> DispatchResult {
        trace!(target: "input.event", text = %event.text, "text");
        let text = event.text.as_str();
        if text.is_empty() {
            return DispatchResult::clean();
        }
        if let Some(c) = self.suppress_text.take() {
            let mut chars = text.chars();
            if chars.next() == Some(c) && chars.next().is_none() {
                trace!(target: "actions.dispatch", text, "text_suppressed");
                return DispatchResult::clean();
            }
        }
        if text == "\t" || self.popup.is_some() {
            return DispatchResult::clean();
        }
        if matches!(self.mode, InputMode::CommandPrefix { .. }) {
            self.disarm_prefix();
            if let Some(c) = text.chars().next() {
                return self.prefix_char(editor, c);
            }
        }
        let mut fell_through = false;
        if matches!(self.mode, InputMode::Search(_)) {
            match self.search_text(editor, text) {
                Some(r) => return r,
                None => fell_through = true,
            }
        }
        if matches!(self.mode, InputMode::LineHighlight { .. }) {
            match self.line_highlight_text(editor, text) {
                Some(r) => return r,
                None => fell_through = true,
            }
        }
        if matches!(self.mode, InputMode::Less) {
            return DispatchResult::clean();
        }
        if editor.leap().is_active() {
            editor.leap_append(text, LeapSource::TextInput);
            return DispatchResult::dirty();
        }
        let result = self.type_text(editor, event);
        if fell_through {
            result.or(DispatchResult::dirty())
        } else {
            result
        }
    }

    fn type_text(&mut self, editor: &mut Editor, event: &TextEvent) -> DispatchResult {
        if event.text != " " {
            self.last_space = None;
            return if editor.insert_text(&event.text) {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            };
        }
        let line = editor.caret_line();
        let caret = editor.caret();
        let after_space = caret > 0 && editor.buffer().rune_at(caret - 1) == Some(' ');
        let window = self.config.double_space_window;
        let in_window = self.last_space.is_some_and(|(at, last_line)| {
            last_line == line && event.timestamp.saturating_duration_since(at) <= window
        });
        if in_window && after_space && editor.selection().range().is_none() {
            self.last_space = None;
            editor.backspace_or_delete_selection(true);
            let start = editor.buffer().line_start(editor.caret());
            editor.insert_at(start, "\t");
            debug!(target: "actions.dispatch", line, "double_space_indent");
            return DispatchResult::dirty();
        }
        editor.insert_text(" ");
        self.last_space = Some((event.timestamp, editor.caret_line()));
        DispatchResult::dirty()
    }
}
