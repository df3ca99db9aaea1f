//! Key-script parser for headless replay.
//!
//! Literal characters type themselves (key-down plus text). Tags in angle
//! brackets name keys: `<Esc>`, `<Enter>`, `<BS>`, `<Del>`, `<Tab>`, arrows,
//! `<Home>`, `<End>`, `<PgUp>`, `<PgDn>`, `<Space>`, `<F1>`..`<F12>`,
//! `<LeapF>`, `<LeapB>`. Modifier prefixes `C-`, `S-`, `A-` may precede any
//! key name (`<C-z>`, `<S-Tab>`, `<C-LeapF>`). `</LeapF>` releases a key,
//! `<lt>` types a literal `<`, `<wait:MS>` pauses so timers can fire.
//! Raw line breaks in the script are layout only and are skipped.

use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, TextEvent};
use std::time::{Duration, Instant};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unterminated tag starting at byte {offset}")]
    Unterminated { offset: usize },
    #[error("unknown key `{name}` at byte {offset}")]
    UnknownKey { name: String, offset: usize },
    #[error("invalid wait duration `{value}` at byte {offset}")]
    BadWait { value: String, offset: usize },
    #[error("release tag `{name}` at byte {offset} cannot carry modifiers")]
    ModifiedRelease { name: String, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Press { code: KeyCode, mods: KeyModifiers },
    Release { code: KeyCode },
    Wait(Duration),
}

impl ScriptStep {
    /// Press of a literal character, with `Shift` for uppercase letters.
    pub fn typed(c: char) -> Self {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        ScriptStep::Press {
            code: KeyCode::Char(c),
            mods,
        }
    }

    /// Host events for this step observed at `at`. A press that would produce
    /// text is followed by the matching text event.
    pub fn events(&self, at: Instant) -> Vec<InputEvent> {
        match *self {
            ScriptStep::Press { code, mods } => {
                let key = KeyEvent::with_mods(code, mods).at(at);
                let mut out = vec![InputEvent::Key(key)];
                if let Some(c) = key.text_char() {
                    out.push(InputEvent::Text(TextEvent {
                        text: c.to_string(),
                        mods,
                        timestamp: at,
                    }));
                }
                out
            }
            ScriptStep::Release { code } => vec![InputEvent::Key(KeyEvent::release(code).at(at))],
            ScriptStep::Wait(_) => Vec::new(),
        }
    }
}

pub fn parse(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    let mut literal = String::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(c) = rest.chars().next() {
        if c != '<' {
            if c != '\n' && c != '\r' {
                literal.push(c);
            }
            offset += c.len_utf8();
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let Some(close) = rest.find('>') else {
            return Err(ScriptError::Unterminated { offset });
        };
        flush_literal(&mut literal, &mut steps);
        let body = &rest[1..close];
        steps.push(parse_tag(body, offset)?);
        offset += close + 1;
        rest = &rest[close + 1..];
    }
    flush_literal(&mut literal, &mut steps);
    Ok(steps)
}

fn flush_literal(literal: &mut String, steps: &mut Vec<ScriptStep>) {
    steps.extend(literal.nfc().map(ScriptStep::typed));
    literal.clear();
}

fn parse_tag(body: &str, offset: usize) -> Result<ScriptStep, ScriptError> {
    if body == "lt" {
        return Ok(ScriptStep::typed('<'));
    }
    if let Some(ms) = body.strip_prefix("wait:") {
        return ms
            .trim()
            .parse::<u64>()
            .map(|ms| ScriptStep::Wait(Duration::from_millis(ms)))
            .map_err(|_| ScriptError::BadWait {
                value: ms.to_string(),
                offset,
            });
    }
    let (release, body) = match body.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, body),
    };

    let (mods, name) = split_modifiers(body);
    let code = key_code(name).ok_or_else(|| ScriptError::UnknownKey {
        name: body.to_string(),
        offset,
    })?;
    if release {
        if !mods.is_empty() {
            return Err(ScriptError::ModifiedRelease {
                name: body.to_string(),
                offset,
            });
        }
        return Ok(ScriptStep::Release { code });
    }
    Ok(ScriptStep::Press { code, mods })
}

fn split_modifiers(mut name: &str) -> (KeyModifiers, &str) {
    let mut mods = KeyModifiers::empty();
    loop {
        let flag = match name.get(..2) {
            Some("C-") => KeyModifiers::CTRL,
            Some("S-") => KeyModifiers::SHIFT,
            Some("A-") => KeyModifiers::ALT,
            _ => break,
        };
        // `<C->` would leave nothing to name; treat the dash as the key.
        if name.len() == 2 {
            break;
        }
        mods |= flag;
        name = &name[2..];
    }
    (mods, name)
}

fn key_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "Esc" => KeyCode::Esc,
        "Enter" | "CR" => KeyCode::Enter,
        "BS" => KeyCode::Backspace,
        "Del" => KeyCode::Delete,
        "Tab" => KeyCode::Tab,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PgUp" => KeyCode::PageUp,
        "PgDn" => KeyCode::PageDown,
        "Space" => KeyCode::Char(' '),
        "LeapF" => KeyCode::LeapForward,
        "LeapB" => KeyCode::LeapBackward,
        _ => {
            if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u8>().ok())
                && (1..=12).contains(&n)
            {
                return Some(KeyCode::F(n));
            }
            let mut chars = name.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            };
        }
    };
    Some(code)
}
