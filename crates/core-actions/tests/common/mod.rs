#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, DispatcherConfig, InputDispatcher};
use core_events::{ArmToken, HelpScheduler, KeyCode, KeyEvent, KeyModifiers, TextEvent};
use core_state::Editor;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Scheduler that records requests so tests can fire (or not fire) them by hand.
#[derive(Clone, Default)]
pub struct RecordingScheduler(pub Rc<RefCell<Vec<(Duration, ArmToken)>>>);

impl HelpScheduler for RecordingScheduler {
    fn schedule_after(&self, delay: Duration, token: ArmToken) {
        self.0.borrow_mut().push((delay, token));
    }
}

/// Editor + dispatcher driven by a synthetic clock.
pub struct Harness {
    pub d: InputDispatcher,
    pub ed: Editor,
    pub clock: Instant,
    pub scheduled: Rc<RefCell<Vec<(Duration, ArmToken)>>>,
}

impl Harness {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, DispatcherConfig::default())
    }

    pub fn with_config(text: &str, cfg: DispatcherConfig) -> Self {
        let sched = RecordingScheduler::default();
        let scheduled = sched.0.clone();
        Self {
            d: InputDispatcher::new(cfg, Box::new(sched)),
            ed: Editor::from_text(text),
            clock: Instant::now(),
            scheduled,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.clock += Duration::from_millis(ms);
    }

    pub fn key_event(&mut self, ev: KeyEvent) -> DispatchResult {
        self.d.handle_key(&mut self.ed, &ev.at(self.clock))
    }

    pub fn key(&mut self, code: KeyCode) -> DispatchResult {
        self.key_event(KeyEvent::press(code))
    }

    pub fn key_mods(&mut self, code: KeyCode, mods: KeyModifiers) -> DispatchResult {
        self.key_event(KeyEvent::with_mods(code, mods))
    }

    pub fn release(&mut self, code: KeyCode) -> DispatchResult {
        self.key_event(KeyEvent::release(code))
    }

    /// Text event with no preceding key-down.
    pub fn text(&mut self, s: &str) -> DispatchResult {
        self.d
            .handle_text(&mut self.ed, &TextEvent::new(s).at(self.clock))
    }

    /// A printable key the way hosts deliver it: key-down, then committed text.
    pub fn type_char(&mut self, c: char) -> DispatchResult {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        let a = self.key_mods(KeyCode::Char(c), mods);
        let b = self.text(&c.to_string());
        a.or(b)
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.type_char(c);
        }
    }

    pub fn last_token(&self) -> Option<ArmToken> {
        self.scheduled.borrow().last().map(|(_, t)| *t)
    }
}
