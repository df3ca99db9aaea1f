use crate::key_token::translate_key_event;
use core_events::{Event, InputEvent, TextEvent};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task reading terminal events from crossterm's `EventStream`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        let stream = EventStream::new();
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            stream_error: None,
        }
    }

    pub async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = self.pump().await;

        if reason == ExitReason::StreamError {
            warn!(target: "input.thread", error_kind = ?self.stream_error, "async_input_task_stream_error");
        }
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }

    async fn pump(&mut self) -> ExitReason {
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => return ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                return ExitReason::StreamEnded;
            };

            let now = Instant::now();
            let events = match result {
                Ok(CEvent::Key(key)) => translate_key_event(&key, now),
                Ok(CEvent::Paste(data)) => {
                    trace!(target: "input.event", len = data.chars().count(), "paste");
                    if data.is_empty() {
                        Vec::new()
                    } else {
                        vec![InputEvent::Text(TextEvent::new(data).at(now))]
                    }
                }
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize_ignored");
                    Vec::new()
                }
                Ok(_) => Vec::new(),
                Err(err) => {
                    self.stream_error = Some(err.kind());
                    return ExitReason::StreamError;
                }
            };

            for input in events {
                trace!(target: "input.event", ?input, "forward");
                if self.sender.send(Event::Input(input)).await.is_err() {
                    return ExitReason::ChannelClosed;
                }
            }
        }
    }
}
