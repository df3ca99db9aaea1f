//! Line highlight: whole-line selection grown one line per `x`.

use super::{DispatchResult, InputDispatcher, InputMode};
use core_events::{KeyCode, KeyEvent};
use core_state::Editor;
use tracing::trace;

impl InputDispatcher {
    pub(super) fn enter_line_highlight(&mut self, editor: &mut Editor, line: usize) -> DispatchResult {
        editor.select_lines(line, line);
        self.set_mode(InputMode::LineHighlight {
            anchor_line: line,
            to_line: line,
        });
        DispatchResult::dirty()
    }

    /// `Esc` drops the highlight; any other key but `x` leaves the mode (keeping
    /// the selection) and is handed back.
    pub(super) fn line_highlight_key(
        &mut self,
        editor: &mut Editor,
        key: &KeyEvent,
    ) -> Option<DispatchResult> {
        match key.code {
            KeyCode::Esc => {
                editor.clear_selection();
                self.set_mode(InputMode::Idle);
                Some(DispatchResult::dirty())
            }
            KeyCode::Char('x') if key.text_char().is_some() => {
                self.suppress_text = Some('x');
                Some(self.extend_line_highlight(editor))
            }
            _ => {
                self.set_mode(InputMode::Idle);
                None
            }
        }
    }

    pub(super) fn line_highlight_text(&mut self, editor: &mut Editor, text: &str) -> Option<DispatchResult> {
        if text == "x" {
            return Some(self.extend_line_highlight(editor));
        }
        self.set_mode(InputMode::Idle);
        None
    }

    fn extend_line_highlight(&mut self, editor: &mut Editor) -> DispatchResult {
        let InputMode::LineHighlight {
            anchor_line,
            to_line,
        } = self.mode
        else {
            return DispatchResult::clean();
        };
        let last = editor.buffer().line_count().saturating_sub(1);
        let to_line = (to_line + 1).min(last);
        editor.select_lines(anchor_line, to_line);
        self.mode = InputMode::LineHighlight {
            anchor_line,
            to_line,
        };
        trace!(target: "actions.mode", anchor_line, to_line, "line_highlight_extend");
        DispatchResult::dirty()
    }
}
