mod common;
use common::*;

use core_actions::{DispatcherConfig, ModeKind};
use core_events::KeyCode;
use pretty_assertions::assert_eq;

#[test]
fn x_grows_block_by_whole_lines() {
    let mut h = Harness::new("l0\nl1\nl2\nl3");
    h.ed.set_caret(4);
    h.key(KeyCode::Esc);
    h.type_char('x');
    assert_eq!(h.d.snapshot().line_highlight, Some((1, 1)));
    assert_eq!(h.ed.selection_text().as_deref(), Some("l1\n"));
    h.type_char('x');
    h.type_char('x');
    assert_eq!(h.d.snapshot().line_highlight, Some((1, 3)));
    assert_eq!(h.ed.selection_text().as_deref(), Some("l1\nl2\nl3"));
    // Already on the last line: stays put.
    h.type_char('x');
    assert_eq!(h.d.snapshot().line_highlight, Some((1, 3)));
    assert_eq!(h.ed.text(), "l0\nl1\nl2\nl3");
}

#[test]
fn escape_exits_and_clears_selection() {
    let mut h = Harness::new("a\nb");
    h.key(KeyCode::Esc);
    h.type_char('x');
    h.key(KeyCode::Esc);
    assert_eq!(h.d.mode().kind(), ModeKind::Idle);
    assert!(!h.ed.selection().active);
    assert!(!h.d.snapshot().prefix_armed);
}

#[test]
fn other_key_exits_and_acts_on_selection() {
    let mut h = Harness::new("keep\ndrop\nkeep");
    h.ed.set_caret(6);
    h.key(KeyCode::Esc);
    h.type_char('x');
    let r = h.key(KeyCode::Delete);
    assert!(r.dirty);
    assert_eq!(h.d.mode().kind(), ModeKind::Idle);
    assert_eq!(h.ed.text(), "keep\nkeep");
}

#[test]
fn typed_text_replaces_highlighted_lines() {
    let mut h = Harness::new("a\nb\n");
    h.key(KeyCode::Esc);
    h.type_char('x');
    h.type_char('z');
    assert_eq!(h.ed.text(), "zb\n");
    assert_eq!(h.d.mode().kind(), ModeKind::Idle);
}

fn less_config() -> DispatcherConfig {
    DispatcherConfig {
        less_page_lines: 2,
        ..DispatcherConfig::default()
    }
}

#[test]
fn less_pages_with_space_without_inserting() {
    let mut h = Harness::with_config("0\n1\n2\n3\n4\n5", less_config());
    h.key(KeyCode::Esc);
    h.type_char(' ');
    assert!(h.d.snapshot().less);
    h.type_char(' ');
    assert_eq!(h.ed.caret_line(), 2);
    h.type_char(' ');
    assert_eq!(h.ed.caret_line(), 4);
    assert_eq!(h.ed.text(), "0\n1\n2\n3\n4\n5");
    // Other input is swallowed.
    h.type_char('q');
    h.key(KeyCode::Up);
    assert_eq!(h.ed.caret_line(), 4);
    assert_eq!(h.ed.text(), "0\n1\n2\n3\n4\n5");
    h.key(KeyCode::Esc);
    assert_eq!(h.d.mode().kind(), ModeKind::Idle);
    assert!(!h.d.snapshot().prefix_armed);
}
