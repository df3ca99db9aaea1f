//! Static key bindings: normal-mode keys and the one-letter command-prefix table.
//!
//! Printable keys without a chord modifier have no normal-mode binding; their
//! text arrives separately as a text event and is inserted from there.

use crate::{Action, EditKind, MotionKind};
use core_events::{KeyCode, KeyEvent};
use core_text::Direction;

/// Prefix commands as `(key, description)`, in help-popup order.
pub const PREFIX_HELP: &[(&str, &str)] = &[
    ("c", "copy selection"),
    ("v", "paste"),
    ("d", "cut selection"),
    ("w", "delete word"),
    ("l", "delete line"),
    ("k", "kill to line end"),
    ("u", "undo"),
    ("r", "redo"),
    ("n", "leap again forward"),
    ("N / p", "leap again backward"),
    ("g / G", "buffer start / end"),
    ("a / e", "line start / end"),
    ("x", "highlight line (x again extends)"),
    ("/", "search"),
    ("Space", "less (page with Space)"),
    ("Esc", "close buffer"),
    ("h / ?", "this help"),
    ("q", "quit"),
];

/// Action for a letter typed while the command prefix is armed.
/// `Space`, `Esc`, `x` and `/` are mode transitions handled by the dispatcher.
pub fn prefix_command(c: char) -> Option<Action> {
    let action = match c {
        'c' => Action::Copy,
        'v' => Action::Paste,
        'd' => Action::Cut,
        'w' => Action::Edit(EditKind::DeleteWord),
        'l' => Action::Edit(EditKind::DeleteLine),
        'k' => Action::Edit(EditKind::KillToLineEnd),
        'u' => Action::Undo,
        'r' => Action::Redo,
        'n' => Action::LeapAgain(Direction::Forward),
        'N' | 'p' => Action::LeapAgain(Direction::Backward),
        'g' => Action::motion(MotionKind::BufferStart),
        'G' => Action::motion(MotionKind::BufferEnd),
        'a' => Action::motion(MotionKind::LineStart),
        'e' => Action::motion(MotionKind::LineEnd),
        'q' => Action::Quit,
        'h' | '?' => Action::ShowHelp,
        _ => return None,
    };
    Some(action)
}

/// Map a key-down in normal editing to an action. `Shift` extends motions.
pub fn normal_action(key: &KeyEvent) -> Option<Action> {
    let extend = key.shift();
    let ctrl = key.ctrl();
    let motion = |kind| Some(Action::Motion { kind, extend });
    match key.code {
        KeyCode::Char(c) if ctrl => ctrl_chord(c),
        KeyCode::Left => motion(MotionKind::Left),
        KeyCode::Right => motion(MotionKind::Right),
        KeyCode::Up => motion(MotionKind::Up),
        KeyCode::Down => motion(MotionKind::Down),
        KeyCode::PageUp => motion(MotionKind::PageUp),
        KeyCode::PageDown => motion(MotionKind::PageDown),
        KeyCode::Home if ctrl => motion(MotionKind::BufferStart),
        KeyCode::End if ctrl => motion(MotionKind::BufferEnd),
        KeyCode::Home => motion(MotionKind::LineStart),
        KeyCode::End => motion(MotionKind::LineEnd),
        KeyCode::Backspace if ctrl => Some(Action::Edit(EditKind::DeleteWord)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Delete => Some(Action::Edit(EditKind::DeleteForward)),
        KeyCode::Enter => Some(Action::Edit(EditKind::InsertNewline)),
        KeyCode::LeapForward if ctrl => Some(Action::LeapAgain(Direction::Forward)),
        KeyCode::LeapBackward if ctrl => Some(Action::LeapAgain(Direction::Backward)),
        KeyCode::LeapForward => Some(Action::LeapStart(Direction::Forward)),
        KeyCode::LeapBackward => Some(Action::LeapStart(Direction::Backward)),
        _ => None,
    }
}

fn ctrl_chord(c: char) -> Option<Action> {
    let action = match c.to_ascii_lowercase() {
        'z' => Action::Undo,
        'y' => Action::Redo,
        'c' => Action::Copy,
        'x' => Action::Cut,
        'v' => Action::Paste,
        'k' => Action::Edit(EditKind::KillToLineEnd),
        'w' => Action::Edit(EditKind::DeleteWord),
        'd' => Action::Edit(EditKind::DeleteLine),
        'q' => Action::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyModifiers;

    #[test]
    fn shift_extends_motions() {
        let k = KeyEvent::with_mods(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(
            normal_action(&k),
            Some(Action::Motion {
                kind: MotionKind::Right,
                extend: true
            })
        );
        let k = KeyEvent::with_mods(KeyCode::Home, KeyModifiers::CTRL | KeyModifiers::SHIFT);
        assert_eq!(
            normal_action(&k),
            Some(Action::Motion {
                kind: MotionKind::BufferStart,
                extend: true
            })
        );
    }

    #[test]
    fn ctrl_chords() {
        let k = |c| KeyEvent::with_mods(KeyCode::Char(c), KeyModifiers::CTRL);
        assert_eq!(normal_action(&k('z')), Some(Action::Undo));
        assert_eq!(normal_action(&k('Q')), Some(Action::Quit));
        assert_eq!(normal_action(&k('j')), None);
        let bs = KeyEvent::with_mods(KeyCode::Backspace, KeyModifiers::CTRL);
        assert_eq!(normal_action(&bs), Some(Action::Edit(EditKind::DeleteWord)));
    }

    #[test]
    fn printable_and_tab_are_unbound() {
        assert_eq!(normal_action(&KeyEvent::press(KeyCode::Char('a'))), None);
        assert_eq!(normal_action(&KeyEvent::press(KeyCode::Tab)), None);
    }

    #[test]
    fn leap_keys_start_or_repeat() {
        assert_eq!(
            normal_action(&KeyEvent::press(KeyCode::LeapBackward)),
            Some(Action::LeapStart(Direction::Backward))
        );
        let k = KeyEvent::with_mods(KeyCode::LeapForward, KeyModifiers::CTRL);
        assert_eq!(normal_action(&k), Some(Action::LeapAgain(Direction::Forward)));
    }

    #[test]
    fn prefix_table_covers_letters() {
        assert_eq!(prefix_command('u'), Some(Action::Undo));
        assert_eq!(prefix_command('p'), prefix_command('N'));
        assert_eq!(prefix_command('?'), Some(Action::ShowHelp));
        assert_eq!(prefix_command('z'), None);
        assert_eq!(prefix_command('x'), None);
    }
}
