//! Input dispatcher: resolves one raw key/text event against the active modes.
//!
//! Key-down precedence (first match wins):
//! 1. popup open: navigation scrolls, `Esc` closes, everything else is swallowed
//! 2. command prefix armed: next key is a one-letter command (`prefix`)
//! 3. search (`search`)
//! 4. line highlight (`line_highlight`)
//! 5. less paging
//! 6. bare `Esc` arms the command prefix and schedules the help popup
//! 7. Leap quasimode keys (`leap`)
//! 8. normal editing through [`keymap::normal_action`]
//!
//! Modes 3 and 4 can hand a key back after exiting; it then continues down the
//! list so, e.g., a letter typed over a locked search match both ends the search
//! and is inserted. Text events follow the same order (see `text`).
//!
//! Key-ups only matter for the Leap quasimode: releasing the session's Leap key
//! commits it. Auto-repeats of `Esc` and the Leap keys, and any repeat while the
//! prefix is armed, are dropped before precedence is evaluated.

use crate::keymap::{self, PREFIX_HELP};
use crate::{Action, DispatchObserver};
use core_config::Config;
use core_events::{ArmToken, HelpScheduler, InputEvent, KeyCode, KeyEvent, NoopScheduler};
use core_state::Editor;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

mod apply;
mod leap;
mod line_highlight;
mod mode;
mod prefix;
mod search;
mod text;

pub use apply::dispatch;
pub use mode::{InputMode, ModeKind, Popup, PopupKind, SearchState};

/// Outcome of one dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Visible state changed; the host should re-render.
    pub dirty: bool,
    /// The host should terminate.
    pub quit: bool,
    /// The host should close the current buffer.
    pub close_buffer: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            close_buffer: false,
        }
    }
    pub fn close_buffer() -> Self {
        Self {
            dirty: true,
            quit: false,
            close_buffer: true,
        }
    }

    /// Union of both results' flags.
    pub fn or(self, other: Self) -> Self {
        Self {
            dirty: self.dirty || other.dirty,
            quit: self.quit || other.quit,
            close_buffer: self.close_buffer || other.close_buffer,
        }
    }
}

/// Timing and paging knobs, usually derived from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub help_delay: Duration,
    pub double_space_window: Duration,
    pub page_lines: usize,
    pub less_page_lines: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DispatcherConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            help_delay: cfg.help_delay(),
            double_space_window: cfg.double_space_window(),
            page_lines: cfg.page_lines(),
            less_page_lines: cfg.less_page_lines(),
        }
    }
}

/// Read-only view of dispatcher state for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSnapshot {
    pub mode: ModeKind,
    pub prefix_armed: bool,
    pub help_visible: bool,
    pub search_query: Option<String>,
    pub search_locked: bool,
    pub search_match: Option<usize>,
    pub last_search_query: String,
    /// `(anchor_line, to_line)` while line highlight is active.
    pub line_highlight: Option<(usize, usize)>,
    pub less: bool,
    pub popup: Option<Popup>,
}

pub struct InputDispatcher {
    mode: InputMode,
    popup: Option<Popup>,
    /// Text rune already consumed through its key-down; the matching text event is dropped.
    suppress_text: Option<char>,
    last_search_query: Vec<char>,
    help_visible: bool,
    arm_generation: ArmToken,
    /// Time and line of the last typed space (double-space indent rule).
    last_space: Option<(Instant, usize)>,
    config: DispatcherConfig,
    scheduler: Box<dyn HelpScheduler>,
    observers: Vec<Box<dyn DispatchObserver>>,
}

impl InputDispatcher {
    pub fn new(config: DispatcherConfig, scheduler: Box<dyn HelpScheduler>) -> Self {
        Self {
            mode: InputMode::Idle,
            popup: None,
            suppress_text: None,
            last_search_query: Vec::new(),
            help_visible: false,
            arm_generation: ArmToken::default(),
            last_space: None,
            config,
            scheduler,
            observers: Vec::new(),
        }
    }

    /// Dispatcher whose help timer never fires.
    pub fn headless(config: DispatcherConfig) -> Self {
        Self::new(config, Box::new(NoopScheduler))
    }

    pub fn add_observer(&mut self, observer: Box<dyn DispatchObserver>) {
        self.observers.push(observer);
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }
    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
    pub fn help_visible(&self) -> bool {
        self.help_visible
    }
    pub fn arm_generation(&self) -> ArmToken {
        self.arm_generation
    }

    /// Show a host popup (symbol info, diagnostics...) that captures navigation keys.
    pub fn open_popup(&mut self, kind: PopupKind, line_count: usize) {
        debug!(target: "actions.mode", ?kind, line_count, "popup_open");
        self.popup = Some(Popup::new(kind, line_count));
    }

    pub fn close_popup(&mut self) {
        if self.popup.take().is_some() {
            debug!(target: "actions.mode", "popup_close");
        }
    }

    pub fn snapshot(&self) -> DispatcherSnapshot {
        let search = match &self.mode {
            InputMode::Search(s) => Some(s),
            _ => None,
        };
        DispatcherSnapshot {
            mode: self.mode.kind(),
            prefix_armed: matches!(self.mode, InputMode::CommandPrefix { .. }),
            help_visible: self.help_visible,
            search_query: search.map(SearchState::query_string),
            search_locked: search.is_some_and(|s| s.locked),
            search_match: search.and_then(|s| s.current_match),
            last_search_query: self.last_search_query.iter().collect(),
            line_highlight: match self.mode {
                InputMode::LineHighlight {
                    anchor_line,
                    to_line,
                } => Some((anchor_line, to_line)),
                _ => None,
            },
            less: matches!(self.mode, InputMode::Less),
            popup: self.popup,
        }
    }

    pub fn handle_event(&mut self, editor: &mut Editor, event: &InputEvent) -> DispatchResult {
        match event {
            InputEvent::Key(key) => self.handle_key(editor, key),
            InputEvent::Text(text) => self.handle_text(editor, text),
        }
    }

    pub fn handle_key(&mut self, editor: &mut Editor, key: &KeyEvent) -> DispatchResult {
        trace!(target: "input.event", key = %key, repeat = key.repeat, "key");
        if !key.down {
            return self.leap_key_up(editor, key);
        }
        if self.drops_repeat(key) {
            trace!(target: "actions.dispatch", key = %key, "repeat_dropped");
            return DispatchResult::clean();
        }
        self.suppress_text = None;

        if self.popup.is_some() {
            return self.popup_key(key);
        }
        let mut fell_through = false;
        if matches!(self.mode, InputMode::CommandPrefix { .. }) {
            match self.prefix_key(editor, key) {
                Some(r) => return r,
                None => fell_through = true,
            }
        }
        if matches!(self.mode, InputMode::Search(_)) {
            match self.search_key(editor, key) {
                Some(r) => return r,
                None => fell_through = true,
            }
        }
        if matches!(self.mode, InputMode::LineHighlight { .. }) {
            match self.line_highlight_key(editor, key) {
                Some(r) => return r,
                None => fell_through = true,
            }
        }
        if matches!(self.mode, InputMode::Less) {
            return self.less_key(editor, key);
        }

        let result = if key.code == KeyCode::Esc && !editor.leap().is_active() {
            self.arm_prefix()
        } else if editor.leap().is_active() {
            self.leap_key(editor, key)
        } else {
            match keymap::normal_action(key) {
                Some(action) => self.apply(action, editor),
                None => DispatchResult::clean(),
            }
        };
        if fell_through {
            result.or(DispatchResult::dirty())
        } else {
            result
        }
    }

    fn drops_repeat(&self, key: &KeyEvent) -> bool {
        key.is_repeat()
            && (key.code == KeyCode::Esc
                || key.code.is_leap()
                || matches!(self.mode, InputMode::CommandPrefix { .. }))
    }

    fn popup_key(&mut self, key: &KeyEvent) -> DispatchResult {
        let page = isize::try_from(self.config.page_lines).unwrap_or(isize::MAX);
        let Some(popup) = self.popup.as_mut() else {
            return DispatchResult::clean();
        };
        if key.code == KeyCode::Esc {
            self.close_popup();
            return DispatchResult::dirty();
        }
        if !key.code.is_navigation() {
            trace!(target: "actions.dispatch", key = %key, "popup_swallowed");
            return DispatchResult::clean();
        }
        match key.code {
            KeyCode::Up | KeyCode::Left => popup.scroll_by(-1),
            KeyCode::Down | KeyCode::Right => popup.scroll_by(1),
            KeyCode::PageUp => popup.scroll_by(-page),
            KeyCode::PageDown => popup.scroll_by(page),
            KeyCode::Home => popup.scroll_to(false),
            _ => popup.scroll_to(true),
        }
        DispatchResult::dirty()
    }

    fn less_key(&mut self, editor: &mut Editor, key: &KeyEvent) -> DispatchResult {
        match key.code {
            KeyCode::Esc => {
                self.set_mode(InputMode::Idle);
                DispatchResult::dirty()
            }
            KeyCode::Char(' ') => {
                self.suppress_text = Some(' ');
                let lines = isize::try_from(self.config.less_page_lines).unwrap_or(isize::MAX);
                editor.move_caret_line(lines, false);
                DispatchResult::dirty()
            }
            _ => DispatchResult::clean(),
        }
    }

    /// Apply `action`, resolving the dispatcher-owned ones locally.
    fn apply(&mut self, action: Action, editor: &mut Editor) -> DispatchResult {
        match action {
            Action::ShowHelp => {
                for obs in &self.observers {
                    obs.on_action(&action);
                }
                self.open_popup(PopupKind::Help, PREFIX_HELP.len());
                DispatchResult::dirty()
            }
            other => dispatch(other, editor, self.config.page_lines, &self.observers),
        }
    }

    fn set_mode(&mut self, mode: InputMode) {
        let from = self.mode.kind();
        self.mode = mode;
        let to = self.mode.kind();
        if from != to {
            debug!(target: "actions.mode", ?from, ?to, "mode_change");
            for obs in &self.observers {
                obs.on_mode_change(from, to);
            }
        }
    }
}
