//! Apply a resolved [`Action`] to the editor.

use super::DispatchResult;
use crate::{Action, DispatchObserver, EditKind, MotionKind};
use core_state::Editor;
use core_text::Direction;
use tracing::trace;

/// Apply `action` to `editor`. `page_lines` sizes PageUp/PageDown.
///
/// `ShowHelp` needs dispatcher state and is a no-op here.
pub fn dispatch(
    action: Action,
    editor: &mut Editor,
    page_lines: usize,
    observers: &[Box<dyn DispatchObserver>],
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }
    trace!(target: "actions.dispatch", ?action, "apply");
    match action {
        Action::Motion { kind, extend } => {
            apply_motion(kind, extend, editor, page_lines);
            DispatchResult::dirty()
        }
        Action::Edit(kind) => changed(apply_edit(kind, editor)),
        Action::Copy => {
            editor.copy_selection();
            DispatchResult::clean()
        }
        Action::Cut => changed(editor.cut_selection()),
        Action::Paste => changed(editor.paste_clipboard()),
        Action::Undo => changed(editor.undo()),
        Action::Redo => changed(editor.redo()),
        Action::LeapStart(dir) => {
            editor.leap_start(dir);
            DispatchResult::dirty()
        }
        Action::LeapAgain(dir) => changed(editor.leap_again(dir)),
        Action::ShowHelp => DispatchResult::clean(),
        Action::CloseBuffer => DispatchResult::close_buffer(),
        Action::Quit => DispatchResult::quit(),
    }
}

fn changed(did: bool) -> DispatchResult {
    if did {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

fn apply_motion(kind: MotionKind, extend: bool, editor: &mut Editor, page_lines: usize) {
    match kind {
        MotionKind::Left => editor.move_caret(-1, extend),
        MotionKind::Right => editor.move_caret(1, extend),
        MotionKind::Up => editor.move_caret_line(-1, extend),
        MotionKind::Down => editor.move_caret_line(1, extend),
        MotionKind::PageUp => editor.move_caret_page(page_lines, Direction::Backward, extend),
        MotionKind::PageDown => editor.move_caret_page(page_lines, Direction::Forward, extend),
        MotionKind::LineStart => editor.caret_to_line_edge(false, extend),
        MotionKind::LineEnd => editor.caret_to_line_edge(true, extend),
        MotionKind::BufferStart => editor.caret_to_buffer_edge(false, extend),
        MotionKind::BufferEnd => editor.caret_to_buffer_edge(true, extend),
    }
}

fn apply_edit(kind: EditKind, editor: &mut Editor) -> bool {
    match kind {
        EditKind::InsertText(text) => editor.insert_text(&text),
        EditKind::InsertNewline => editor.insert_text("\n"),
        EditKind::Backspace => editor.backspace_or_delete_selection(true),
        EditKind::DeleteForward => editor.backspace_or_delete_selection(false),
        EditKind::DeleteWord => editor.delete_word_at_caret(),
        EditKind::DeleteLine => editor.delete_line_at_caret(),
        EditKind::KillToLineEnd => editor.kill_to_line_end(),
    }
}
