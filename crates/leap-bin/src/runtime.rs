//! Single-threaded event loop driving the dispatcher and editor.

use crate::script::ScriptStep;
use core_actions::{Action, DispatchObserver, DispatchResult, InputDispatcher, ModeKind};
use core_events::Event;
use core_state::Editor;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Quit,
    CloseBuffer,
    ShutdownEvent,
    ChannelClosed,
    ScriptEnd,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::CloseBuffer => "close_buffer",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
            ShutdownReason::ScriptEnd => "script_end",
        }
    }
}

enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

/// Forwards dispatcher notifications into the log.
struct TraceObserver;

impl DispatchObserver for TraceObserver {
    fn on_action(&self, action: &Action) {
        debug!(target: "runtime.events", ?action, "action");
    }

    fn on_mode_change(&self, from: ModeKind, to: ModeKind) {
        debug!(target: "runtime.events", ?from, ?to, "mode");
    }
}

pub struct EditorRuntime {
    editor: Editor,
    dispatcher: InputDispatcher,
    rx: Receiver<Event>,
}

impl EditorRuntime {
    pub fn new(editor: Editor, mut dispatcher: InputDispatcher, rx: Receiver<Event>) -> Self {
        dispatcher.add_observer(Box::new(TraceObserver));
        Self {
            editor,
            dispatcher,
            rx,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    fn handle_event(&mut self, event: &Event) -> LoopControl {
        let result = match event {
            Event::Input(input) => self.dispatcher.handle_event(&mut self.editor, input),
            Event::HelpTimer(token) => self.dispatcher.on_help_timer(*token),
            Event::Shutdown => return LoopControl::Break(ShutdownReason::ShutdownEvent),
        };
        self.after_dispatch(result)
    }

    fn after_dispatch(&self, result: DispatchResult) -> LoopControl {
        if result.dirty {
            trace!(
                target: "runtime",
                caret = self.editor.caret(),
                len = self.editor.buffer().len(),
                mode = ?self.dispatcher.mode().kind(),
                "state_changed"
            );
        }
        if result.quit {
            LoopControl::Break(ShutdownReason::Quit)
        } else if result.close_buffer {
            LoopControl::Break(ShutdownReason::CloseBuffer)
        } else {
            LoopControl::Continue
        }
    }

    /// Consume events from the channel until the session ends.
    pub async fn run(&mut self) -> ShutdownReason {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();
        while let Some(event) = self.rx.recv().await {
            if let LoopControl::Break(reason) = self.handle_event(&event) {
                return reason;
            }
        }
        ShutdownReason::ChannelClosed
    }

    /// Feed a parsed key script through the dispatcher.
    ///
    /// Event timestamps follow a virtual clock that only advances on `wait`
    /// steps, so time-window rules behave the same on every run. Waits also
    /// sleep for real and then drain the channel so pending help timers fire.
    pub async fn replay(&mut self, steps: &[ScriptStep]) -> ShutdownReason {
        let base = Instant::now();
        let mut elapsed = Duration::ZERO;
        for step in steps {
            if let ScriptStep::Wait(delay) = step {
                elapsed += *delay;
                tokio::time::sleep(*delay).await;
                if let LoopControl::Break(reason) = self.drain_pending() {
                    return reason;
                }
                continue;
            }
            for input in step.events(base + elapsed) {
                if let LoopControl::Break(reason) = self.handle_event(&Event::Input(input)) {
                    return reason;
                }
            }
        }
        ShutdownReason::ScriptEnd
    }

    fn drain_pending(&mut self) -> LoopControl {
        while let Ok(event) = self.rx.try_recv() {
            if let LoopControl::Break(reason) = self.handle_event(&event) {
                return LoopControl::Break(reason);
            }
        }
        LoopControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script;
    use core_actions::DispatcherConfig;
    use core_events::{EVENT_CHANNEL_CAP, TokioHelpScheduler};
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn runtime(text: &str, config: DispatcherConfig) -> (EditorRuntime, mpsc::Sender<Event>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAP);
        let dispatcher =
            InputDispatcher::new(config, Box::new(TokioHelpScheduler::new(tx.clone())));
        (EditorRuntime::new(Editor::from_text(text), dispatcher, rx), tx)
    }

    #[tokio::test]
    async fn replay_types_and_leaps() {
        let (mut rt, _tx) = runtime("", DispatcherConfig::default());
        let steps = script::parse("hello world<Home><LeapF>wor</LeapF>X").unwrap();
        let reason = rt.replay(&steps).await;
        assert_eq!(reason, ShutdownReason::ScriptEnd);
        assert_eq!(rt.editor().text(), "hello Xworld");
    }

    #[tokio::test]
    async fn prefix_quit_stops_replay_early() {
        let (mut rt, _tx) = runtime("abc", DispatcherConfig::default());
        let steps = script::parse("<Esc>qzzz").unwrap();
        assert_eq!(rt.replay(&steps).await, ShutdownReason::Quit);
        assert_eq!(rt.editor().text(), "abc");
    }

    #[tokio::test]
    async fn wait_lets_help_timer_fire() {
        let config = DispatcherConfig {
            help_delay: Duration::from_millis(5),
            ..DispatcherConfig::default()
        };
        let (mut rt, _tx) = runtime("abc", config);
        let steps = script::parse("<Esc><wait:60>").unwrap();
        rt.replay(&steps).await;
        assert!(rt.dispatcher().help_visible());
    }

    #[tokio::test]
    async fn virtual_clock_separates_spaces() {
        let (mut rt, _tx) = runtime("", DispatcherConfig::default());
        let steps = script::parse("a  b <wait:500> ").unwrap();
        rt.replay(&steps).await;
        assert_eq!(rt.editor().text(), "\tab  ");
    }

    #[tokio::test]
    async fn run_ends_on_shutdown_event() {
        let (mut rt, tx) = runtime("", DispatcherConfig::default());
        tx.send(Event::Input(core_events::InputEvent::Text(
            core_events::TextEvent::new("hi"),
        )))
        .await
        .unwrap();
        tx.send(Event::Shutdown).await.unwrap();
        assert_eq!(rt.run().await, ShutdownReason::ShutdownEvent);
        assert_eq!(rt.editor().text(), "hi");
    }
}
