//! Caret motions with optional selection extension.
//!
//! Extending a motion anchors a new selection at the pre-move caret when none is
//! active; otherwise only the moving end `b` follows the caret. A non-extending
//! motion clears the selection.

use crate::{Editor, Selection};
use core_text::Direction;
use tracing::trace;

impl Editor {
    fn apply_move(&mut self, target: usize, extend: bool) {
        let target = target.min(self.buffer.len());
        if extend {
            if !self.selection.active {
                self.selection = Selection::new(self.caret, self.caret);
            }
            self.caret = target;
            self.selection.b = target;
        } else {
            self.caret = target;
            self.selection.clear();
        }
        trace!(target: "state.edit", caret = self.caret, extend, "motion");
    }

    /// Move by `delta` runes (negative moves left).
    pub fn move_caret(&mut self, delta: isize, extend: bool) {
        let target = self.caret.saturating_add_signed(delta);
        self.apply_move(target, extend);
    }

    /// Move by `delta_lines` lines keeping the column, clamped to the target line length.
    pub fn move_caret_line(&mut self, delta_lines: isize, extend: bool) {
        let line = self.buffer.line_of(self.caret);
        let col = self.buffer.column_of(self.caret);
        let last = self.buffer.line_count() - 1;
        let target_line = line.saturating_add_signed(delta_lines).min(last);
        let start = self.buffer.line_start_of(target_line);
        let target = start + col.min(self.buffer.line_len(target_line));
        self.apply_move(target, extend);
    }

    /// Move `page_lines` lines in `dir`.
    pub fn move_caret_page(&mut self, page_lines: usize, dir: Direction, extend: bool) {
        let n = isize::try_from(page_lines).unwrap_or(isize::MAX);
        let delta = if dir.is_forward() { n } else { -n };
        self.move_caret_line(delta, extend);
    }

    pub fn caret_to_line_edge(&mut self, to_end: bool, extend: bool) {
        let target = if to_end {
            self.buffer.line_end(self.caret)
        } else {
            self.buffer.line_start(self.caret)
        };
        self.apply_move(target, extend);
    }

    pub fn caret_to_buffer_edge(&mut self, to_end: bool, extend: bool) {
        let target = if to_end { self.buffer.len() } else { 0 };
        self.apply_move(target, extend);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Editor, Selection};
    use core_text::Direction;

    #[test]
    fn horizontal_moves_clamp() {
        let mut ed = Editor::from_text("abc");
        ed.move_caret(-5, false);
        assert_eq!(ed.caret(), 0);
        ed.move_caret(10, false);
        assert_eq!(ed.caret(), 3);
    }

    #[test]
    fn extend_anchors_once_then_moves_b() {
        let mut ed = Editor::from_text("abcdef");
        ed.set_caret(2);
        ed.move_caret(1, true);
        ed.move_caret(2, true);
        assert_eq!(ed.selection(), Selection::new(2, 5));
        ed.move_caret(-4, true);
        assert_eq!(ed.selection(), Selection::new(2, 1));
        assert_eq!(ed.selection().normalize(), (1, 2));
        ed.move_caret(1, false);
        assert!(!ed.selection().active);
    }

    #[test]
    fn vertical_moves_preserve_column() {
        let mut ed = Editor::from_text("abcd\nx\nwxyz");
        ed.set_caret(3);
        ed.move_caret_line(1, false);
        assert_eq!(ed.caret(), 6);
        ed.move_caret_line(1, false);
        assert_eq!(ed.caret(), 8);
        ed.move_caret_line(-10, false);
        assert_eq!(ed.caret(), 1);
        ed.move_caret_line(10, false);
        assert_eq!(ed.caret_line(), 2);
    }

    #[test]
    fn page_and_edges() {
        let mut ed = Editor::from_text("1\n2\n3\n4\n5");
        ed.move_caret_page(3, Direction::Forward, false);
        assert_eq!(ed.caret_line(), 3);
        ed.move_caret_page(2, Direction::Backward, true);
        assert_eq!(ed.caret_line(), 1);
        assert!(ed.selection().active);
        ed.caret_to_buffer_edge(true, false);
        assert_eq!(ed.caret(), 9);
        ed.caret_to_line_edge(false, false);
        assert_eq!(ed.caret(), 8);
        ed.caret_to_buffer_edge(false, true);
        assert_eq!(ed.selection().normalize(), (0, 8));
    }
}
