//! Core event types consumed by the input dispatcher, plus the delayed-callback
//! capability used for the command-prefix help popup.
//!
//! The core is agnostic to the host's native key representation: a translation
//! layer (see `core-input`) maps terminal or windowing codes into the abstract
//! [`KeyEvent`] / [`TextEvent`] values defined here.

use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Sender;
use tracing::{trace, warn};

/// Capacity of the bounded runtime channel carrying [`Event`]s into the loop.
pub const EVENT_CHANNEL_CAP: usize = 8192;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    /// A delayed help callback fired; carries the arm token it was scheduled with.
    HelpTimer(ArmToken),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Raw key transition (down or up).
    Key(KeyEvent),
    /// Committed, already-composed Unicode text.
    Text(TextEvent),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
        const SUPER = 0b0001_0000;
    }
}

impl KeyModifiers {
    /// Modifiers that turn a printable key into a chord (no text produced).
    pub fn is_chord(self) -> bool {
        self.intersects(Self::CTRL | Self::ALT | Self::META | Self::SUPER)
    }
}

/// Abstract key codes. `LeapForward` / `LeapBackward` are the two dedicated Leap keys;
/// hosts without such keys map some other physical key onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    LeapForward,
    LeapBackward,
    F(u8),
}

impl KeyCode {
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }

    pub fn is_leap(self) -> bool {
        matches!(self, KeyCode::LeapForward | KeyCode::LeapBackward)
    }
}

/// A key transition.
///
/// * `down`: `true` for press, `false` for release.
/// * `repeat`: auto-repeat counter reported by the host (`0` for the initial press).
/// * `timestamp`: instant the host observed the event; used for time-window rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub down: bool,
    pub repeat: u16,
    pub timestamp: Instant,
}

impl KeyEvent {
    /// Key press with no modifiers observed now.
    pub fn press(code: KeyCode) -> Self {
        Self::with_mods(code, KeyModifiers::empty())
    }

    /// Key press with explicit modifiers observed now.
    pub fn with_mods(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            down: true,
            repeat: 0,
            timestamp: Instant::now(),
        }
    }

    /// Key release observed now.
    pub fn release(code: KeyCode) -> Self {
        Self {
            down: false,
            ..Self::press(code)
        }
    }

    /// Override the timestamp (tests and replay).
    pub fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark as an auto-repeat with the given counter.
    pub fn repeated(mut self, repeat: u16) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat > 0
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    /// Character this key would also deliver as a text-insertion event, if any.
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.is_chord() => Some(c),
            _ => None,
        }
    }

    /// Character for the Leap key-down fallback path. Unlike [`text_char`](Self::text_char)
    /// this ignores a held modifier, since some hosts suppress text while one is down.
    pub fn fallback_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.contains(KeyModifiers::CTRL) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.down { "down" } else { "up" };
        write!(f, "{:?}{:?}/{}", self.code, self.mods, dir)
    }
}

/// Committed text (as opposed to raw key codes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEvent {
    pub text: String,
    pub mods: KeyModifiers,
    pub timestamp: Instant,
}

impl TextEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mods: KeyModifiers::empty(),
            timestamp: Instant::now(),
        }
    }

    pub fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }
}

// -------------------------------------------------------------------------------------------------
// Delayed help callback
// -------------------------------------------------------------------------------------------------

/// Generation of a command-prefix arm. A fired timer is acted on only when its token
/// still equals the dispatcher's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ArmToken(pub u64);

impl ArmToken {
    pub fn next(self) -> Self {
        ArmToken(self.0.wrapping_add(1))
    }
}

/// One-shot delayed callback service. Implementations must eventually deliver the token
/// back to the dispatcher (`InputDispatcher::on_help_timer`) on the event-loop thread.
pub trait HelpScheduler {
    fn schedule_after(&self, delay: Duration, token: ArmToken);
}

/// Scheduler that never fires (headless tests, hosts without a help popup).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl HelpScheduler for NoopScheduler {
    fn schedule_after(&self, _delay: Duration, _token: ArmToken) {}
}

/// Tokio-backed scheduler: sleeps on the runtime and posts [`Event::HelpTimer`] into
/// the loop channel. Requires a running tokio runtime on the calling thread.
#[derive(Debug, Clone)]
pub struct TokioHelpScheduler {
    tx: Sender<Event>,
}

impl TokioHelpScheduler {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx }
    }
}

impl HelpScheduler for TokioHelpScheduler {
    fn schedule_after(&self, delay: Duration, token: ArmToken) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(target: "runtime.events", token = token.0, "help_timer_no_runtime");
            return;
        };
        let tx = self.tx.clone();
        trace!(target: "runtime.events", token = token.0, delay_ms = delay.as_millis() as u64, "help_timer_scheduled");
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the loop already shut down.
            let _ = tx.send(Event::HelpTimer(token)).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::with_mods(KeyCode::Char('x'), KeyModifiers::CTRL);
        let s = format!("{}", k);
        assert!(s.contains("Char"));
        assert!(s.contains("down"));
    }

    #[test]
    fn text_char_respects_chords() {
        assert_eq!(KeyEvent::press(KeyCode::Char('a')).text_char(), Some('a'));
        assert_eq!(
            KeyEvent::with_mods(KeyCode::Char('A'), KeyModifiers::SHIFT).text_char(),
            Some('A')
        );
        assert_eq!(
            KeyEvent::with_mods(KeyCode::Char('a'), KeyModifiers::CTRL).text_char(),
            None
        );
        assert_eq!(KeyEvent::press(KeyCode::Enter).text_char(), None);
    }

    #[test]
    fn fallback_char_tolerates_alt() {
        let k = KeyEvent::with_mods(KeyCode::Char('q'), KeyModifiers::ALT);
        assert_eq!(k.text_char(), None);
        assert_eq!(k.fallback_char(), Some('q'));
    }

    #[test]
    fn release_and_repeat_builders() {
        let up = KeyEvent::release(KeyCode::LeapForward);
        assert!(!up.down);
        assert!(up.code.is_leap());
        let rep = KeyEvent::press(KeyCode::Down).repeated(3);
        assert!(rep.is_repeat());
        assert!(rep.code.is_navigation());
    }

    #[test]
    fn arm_token_advances() {
        let t = ArmToken::default();
        assert_eq!(t.next(), ArmToken(1));
        assert!(t.next() > t);
    }

    #[tokio::test]
    async fn tokio_scheduler_posts_token() {
        let (tx, mut rx) = mpsc::channel::<Event>(4);
        let sched = TokioHelpScheduler::new(tx);
        sched.schedule_after(Duration::from_millis(5), ArmToken(7));
        let ev = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timer should fire")
            .expect("channel open");
        assert_eq!(ev, Event::HelpTimer(ArmToken(7)));
    }

    #[test]
    fn tokio_scheduler_without_runtime_is_noop() {
        let (tx, mut rx) = mpsc::channel::<Event>(4);
        let sched = TokioHelpScheduler::new(tx);
        sched.schedule_after(Duration::from_millis(1), ArmToken(1));
        assert!(rx.try_recv().is_err());
    }
}
