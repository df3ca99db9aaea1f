//! Incremental search mode.
//!
//! Unlocked: typed text extends the query and the caret jumps live to the first
//! match at or after the origin (wrapping). `/` (or `Enter`) locks a non-empty
//! query; on an empty query it reuses the last locked query and advances to the
//! next match. `Esc` restores the origin.
//!
//! Locked onto a match: `Tab`/`Shift+Tab` step with wrap, `x` switches to line
//! highlight at the match, `Esc` leaves the caret on the match. Any other key
//! ends search and is handed back to the caller.

use super::{DispatchResult, InputDispatcher, InputMode, SearchState};
use core_events::{KeyCode, KeyEvent};
use core_state::Editor;
use core_text::{Direction, find_in_dir};
use tracing::{debug, trace};

impl InputDispatcher {
    pub(super) fn enter_search(&mut self, editor: &mut Editor) -> DispatchResult {
        self.set_mode(InputMode::Search(SearchState::new(editor.caret())));
        DispatchResult::dirty()
    }

    pub(super) fn search_key(&mut self, editor: &mut Editor, key: &KeyEvent) -> Option<DispatchResult> {
        let InputMode::Search(state) = &mut self.mode else {
            return None;
        };
        if state.has_locked_match() {
            match key.code {
                KeyCode::Esc => {
                    self.set_mode(InputMode::Idle);
                    Some(DispatchResult::dirty())
                }
                KeyCode::Tab => {
                    let dir = if key.shift() {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    };
                    Some(self.search_step(editor, dir))
                }
                KeyCode::Char('x') if key.text_char().is_some() => {
                    self.suppress_text = Some('x');
                    Some(self.search_to_line_highlight(editor))
                }
                _ => {
                    self.exit_search();
                    None
                }
            }
        } else {
            match key.code {
                KeyCode::Esc => {
                    editor.set_caret(state.origin_caret);
                    self.set_mode(InputMode::Idle);
                    Some(DispatchResult::dirty())
                }
                KeyCode::Enter => Some(self.search_lock(editor)),
                KeyCode::Char('/') if key.text_char().is_some() => {
                    self.suppress_text = Some('/');
                    Some(self.search_lock(editor))
                }
                KeyCode::Backspace => {
                    if state.query.pop().is_none() {
                        return Some(DispatchResult::clean());
                    }
                    self.search_refresh(editor);
                    Some(DispatchResult::dirty())
                }
                // The query grows from the matching text event.
                _ if key.text_char().is_some() => Some(DispatchResult::clean()),
                _ => {
                    self.exit_search();
                    None
                }
            }
        }
    }

    /// Text typed during search. `None` means search ended and the text continues
    /// to normal insertion.
    pub(super) fn search_text(&mut self, editor: &mut Editor, text: &str) -> Option<DispatchResult> {
        let InputMode::Search(state) = &mut self.mode else {
            return None;
        };
        if state.has_locked_match() {
            if text == "x" {
                return Some(self.search_to_line_highlight(editor));
            }
            self.exit_search();
            return None;
        }
        if text == "/" {
            return Some(self.search_lock(editor));
        }
        state.query.extend(text.chars());
        self.search_refresh(editor);
        Some(DispatchResult::dirty())
    }

    /// Re-run the query from the origin, moving the caret to the match.
    fn search_refresh(&mut self, editor: &mut Editor) {
        let InputMode::Search(state) = &mut self.mode else {
            return;
        };
        if state.query.is_empty() {
            editor.set_caret(state.origin_caret);
            state.current_match = None;
            return;
        }
        let hay = editor.buffer().all_runes();
        let found = find_in_dir(&hay, &state.query, state.origin_caret, Direction::Forward, true);
        if let Some(pos) = found {
            editor.set_caret(pos);
        }
        state.current_match = found;
        trace!(target: "actions.dispatch", query = %state.query_string(), found = ?found, "search_refresh");
    }

    fn search_lock(&mut self, editor: &mut Editor) -> DispatchResult {
        let InputMode::Search(state) = &mut self.mode else {
            return DispatchResult::clean();
        };
        if state.query.is_empty() {
            if self.last_search_query.is_empty() {
                return DispatchResult::clean();
            }
            state.query = self.last_search_query.clone();
            let hay = editor.buffer().all_runes();
            let found = find_in_dir(&hay, &state.query, editor.caret() + 1, Direction::Forward, true);
            if let Some(pos) = found {
                editor.set_caret(pos);
            }
            state.current_match = found;
        } else {
            self.last_search_query = state.query.clone();
        }
        state.locked = true;
        debug!(target: "actions.mode", query = %state.query_string(), found = ?state.current_match, "search_locked");
        DispatchResult::dirty()
    }

    fn search_step(&mut self, editor: &mut Editor, dir: Direction) -> DispatchResult {
        let InputMode::Search(state) = &mut self.mode else {
            return DispatchResult::clean();
        };
        let hay = editor.buffer().all_runes();
        let start = match dir {
            Direction::Forward => editor.caret() + 1,
            Direction::Backward => editor.caret(),
        };
        if let Some(pos) = find_in_dir(&hay, &state.query, start, dir, true) {
            editor.set_caret(pos);
            state.current_match = Some(pos);
        }
        DispatchResult::dirty()
    }

    fn search_to_line_highlight(&mut self, editor: &mut Editor) -> DispatchResult {
        let InputMode::Search(state) = &self.mode else {
            return DispatchResult::clean();
        };
        let at = state.current_match.unwrap_or(editor.caret());
        let line = editor.buffer().line_of(at);
        self.enter_line_highlight(editor, line)
    }

    fn exit_search(&mut self) {
        if let InputMode::Search(state) = &self.mode
            && state.locked
            && !state.query.is_empty()
        {
            self.last_search_query = state.query.clone();
        }
        self.set_mode(InputMode::Idle);
    }
}
