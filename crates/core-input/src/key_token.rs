use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, TextEvent};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};
use std::time::Instant;

/// Terminals have no dedicated Leap keys; `Alt+.` and `Alt+,` stand in for them.
const LEAP_FORWARD_CHAR: char = '.';
const LEAP_BACKWARD_CHAR: char = ',';

/// Translate one crossterm key event into abstract input events.
///
/// A printable press (or auto-repeat) without chord modifiers yields the key
/// transition followed by a text event carrying the character, mirroring how a
/// windowing host delivers key-down and committed text separately. Releases
/// and non-printable keys yield only the key transition. Unsupported codes
/// (media keys, lock keys, bare modifiers) yield nothing.
pub(crate) fn translate_key_event(event: &CKeyEvent, now: Instant) -> Vec<InputEvent> {
    let Some((code, mods)) = map_key_code(&event.code, map_mod_mask(event.modifiers)) else {
        return Vec::new();
    };
    let down = !matches!(event.kind, CKeyEventKind::Release);
    let repeat = u16::from(matches!(event.kind, CKeyEventKind::Repeat));
    let key = KeyEvent {
        code,
        mods,
        down,
        repeat,
        timestamp: now,
    };
    let mut out = vec![InputEvent::Key(key)];
    if down && let Some(c) = key.text_char() {
        out.push(InputEvent::Text(TextEvent {
            text: c.to_string(),
            mods,
            timestamp: now,
        }));
    }
    out
}

/// Convert a crossterm key code into an abstract key code, adjusting modifiers
/// where the mapping absorbs one (the Leap stand-ins drop `Alt`, `BackTab`
/// gains `Shift`).
pub(crate) fn map_key_code(code: &CKeyCode, mods: KeyModifiers) -> Option<(KeyCode, KeyModifiers)> {
    let mapped = match code {
        CKeyCode::Char(c) if mods.contains(KeyModifiers::ALT) && *c == LEAP_FORWARD_CHAR => {
            return Some((KeyCode::LeapForward, mods - KeyModifiers::ALT));
        }
        CKeyCode::Char(c) if mods.contains(KeyModifiers::ALT) && *c == LEAP_BACKWARD_CHAR => {
            return Some((KeyCode::LeapBackward, mods - KeyModifiers::ALT));
        }
        CKeyCode::BackTab => return Some((KeyCode::Tab, mods | KeyModifiers::SHIFT)),
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::F(n) => KeyCode::F(*n),
        CKeyCode::Insert
        | CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some((mapped, mods))
}

/// Convert crossterm modifier flags into abstract modifier bits.
pub(crate) fn map_mod_mask(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if mods.contains(CKeyModifiers::SUPER) {
        out |= KeyModifiers::SUPER;
    }
    if mods.contains(CKeyModifiers::META) {
        out |= KeyModifiers::META;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    fn translate(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> Vec<InputEvent> {
        translate_key_event(&key_event(code, modifiers, kind), Instant::now())
    }

    fn only_key(events: &[InputEvent]) -> KeyEvent {
        match events {
            [InputEvent::Key(k)] => *k,
            other => panic!("expected a single key event, got {other:?}"),
        }
    }

    #[test]
    fn printable_press_emits_key_then_text() {
        let out = translate(CKeyCode::Char('a'), CKeyModifiers::NONE, CKeyEventKind::Press);
        match out.as_slice() {
            [InputEvent::Key(k), InputEvent::Text(t)] => {
                assert_eq!(k.code, KeyCode::Char('a'));
                assert!(k.down);
                assert_eq!(k.repeat, 0);
                assert_eq!(t.text, "a");
                assert_eq!(k.timestamp, t.timestamp);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn shifted_char_still_produces_text() {
        let out = translate(CKeyCode::Char('Q'), CKeyModifiers::SHIFT, CKeyEventKind::Press);
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[1], InputEvent::Text(t) if t.text == "Q"));
    }

    #[test]
    fn ctrl_chord_has_no_text() {
        let k = only_key(&translate(
            CKeyCode::Char('z'),
            CKeyModifiers::CONTROL,
            CKeyEventKind::Press,
        ));
        assert_eq!(k.code, KeyCode::Char('z'));
        assert!(k.mods.contains(KeyModifiers::CTRL));
    }

    #[test]
    fn named_key_maps_without_text() {
        let k = only_key(&translate(
            CKeyCode::Enter,
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        ));
        assert_eq!(k.code, KeyCode::Enter);
    }

    #[test]
    fn release_is_key_up_only() {
        let k = only_key(&translate(
            CKeyCode::Char('a'),
            CKeyModifiers::NONE,
            CKeyEventKind::Release,
        ));
        assert!(!k.down);
    }

    #[test]
    fn repeat_sets_counter_and_keeps_text() {
        let out = translate(CKeyCode::Char('j'), CKeyModifiers::NONE, CKeyEventKind::Repeat);
        match out.as_slice() {
            [InputEvent::Key(k), InputEvent::Text(_)] => assert!(k.is_repeat()),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn alt_period_and_comma_are_leap_keys() {
        let fwd = only_key(&translate(
            CKeyCode::Char('.'),
            CKeyModifiers::ALT,
            CKeyEventKind::Press,
        ));
        assert_eq!(fwd.code, KeyCode::LeapForward);
        assert!(fwd.mods.is_empty());

        let back = only_key(&translate(
            CKeyCode::Char(','),
            CKeyModifiers::ALT | CKeyModifiers::CONTROL,
            CKeyEventKind::Press,
        ));
        assert_eq!(back.code, KeyCode::LeapBackward);
        assert_eq!(back.mods, KeyModifiers::CTRL);

        let up = only_key(&translate(
            CKeyCode::Char('.'),
            CKeyModifiers::ALT,
            CKeyEventKind::Release,
        ));
        assert_eq!(up.code, KeyCode::LeapForward);
        assert!(!up.down);
    }

    #[test]
    fn plain_period_is_text() {
        let out = translate(CKeyCode::Char('.'), CKeyModifiers::NONE, CKeyEventKind::Press);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn backtab_becomes_shift_tab() {
        let k = only_key(&translate(
            CKeyCode::BackTab,
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        ));
        assert_eq!(k.code, KeyCode::Tab);
        assert!(k.shift());
    }

    #[test]
    fn maps_all_modifier_bits() {
        let m = map_mod_mask(
            CKeyModifiers::CONTROL | CKeyModifiers::SUPER | CKeyModifiers::META,
        );
        assert!(m.contains(KeyModifiers::CTRL | KeyModifiers::SUPER | KeyModifiers::META));
        assert!(!m.contains(KeyModifiers::ALT));
    }

    #[test]
    fn unsupported_keys_return_nothing() {
        assert!(translate(CKeyCode::CapsLock, CKeyModifiers::NONE, CKeyEventKind::Press).is_empty());
        assert!(translate(CKeyCode::Insert, CKeyModifiers::NONE, CKeyEventKind::Press).is_empty());
    }
}
