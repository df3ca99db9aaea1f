mod common;
use common::*;

use core_actions::DispatcherConfig;
use core_events::KeyCode;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn double_space_indents_line() {
    let mut h = Harness::new("");
    h.type_str("ab");
    h.type_char(' ');
    h.advance(100);
    h.type_char(' ');
    assert_eq!(h.ed.text(), "\tab");
    assert_eq!(h.ed.caret(), 3);

    // Two ordinary undo steps: the tab insert, then the space removal.
    h.key_mods(KeyCode::Char('z'), core_events::KeyModifiers::CTRL);
    assert_eq!(h.ed.text(), "ab");
    h.key_mods(KeyCode::Char('z'), core_events::KeyModifiers::CTRL);
    assert_eq!(h.ed.text(), "ab ");
}

#[test]
fn slow_spaces_are_plain_spaces() {
    let mut h = Harness::with_config(
        "",
        DispatcherConfig {
            double_space_window: Duration::from_millis(50),
            ..DispatcherConfig::default()
        },
    );
    h.type_str("a");
    h.type_char(' ');
    h.advance(51);
    h.type_char(' ');
    assert_eq!(h.ed.text(), "a  ");
}

#[test]
fn double_space_on_second_line() {
    let mut h = Harness::new("first\n");
    h.ed.set_caret(6);
    h.type_str("x  ");
    assert_eq!(h.ed.text(), "first\n\tx");
}

#[test]
fn spaces_split_by_newline_stay_plain() {
    let mut h = Harness::new("");
    h.type_char(' ');
    h.key(KeyCode::Enter);
    h.type_char(' ');
    assert_eq!(h.ed.text(), " \n ");
    assert_eq!(h.ed.caret(), 3);
}

#[test]
fn second_space_needs_space_before_caret() {
    let mut h = Harness::new("ab");
    h.ed.set_caret(2);
    h.type_char(' ');
    h.ed.set_caret(2);
    h.type_char(' ');
    assert_eq!(h.ed.text(), "ab  ");
    assert!(!h.ed.text().contains('\t'));
}

#[test]
fn space_run_resets_after_other_text() {
    let mut h = Harness::new("");
    h.type_char(' ');
    h.type_char('a');
    h.type_char(' ');
    assert_eq!(h.ed.text(), " a ");
}

#[test]
fn lone_tab_and_empty_text_ignored() {
    let mut h = Harness::new("x");
    assert!(!h.text("\t").dirty);
    assert!(!h.text("").dirty);
    assert_eq!(h.ed.text(), "x");
    h.text("\tok");
    assert_eq!(h.ed.text(), "\tokx");
}

#[test]
fn typing_replaces_selection() {
    let mut h = Harness::new("hello world");
    h.ed.set_caret(6);
    h.key(KeyCode::End);
    assert_eq!(h.ed.caret(), 11);
    for _ in 0..5 {
        h.key_mods(KeyCode::Left, core_events::KeyModifiers::SHIFT);
    }
    h.type_str("cat");
    assert_eq!(h.ed.text(), "hello cat");
    assert_eq!(h.ed.caret(), 9);
}

#[test]
fn multi_rune_text_inserts_whole() {
    let mut h = Harness::new("");
    h.text("héllo wörld");
    assert_eq!(h.ed.text(), "héllo wörld");
    assert_eq!(h.ed.caret(), 11);
}

#[test]
fn enter_inserts_newline_and_backspace_joins() {
    let mut h = Harness::new("ab");
    h.ed.set_caret(1);
    h.key(KeyCode::Enter);
    assert_eq!(h.ed.text(), "a\nb");
    h.key(KeyCode::Backspace);
    assert_eq!(h.ed.text(), "ab");
}
