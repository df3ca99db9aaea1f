//! Terminal host translation layer.
//!
//! Converts crossterm events into the abstract [`core_events::KeyEvent`] /
//! [`core_events::TextEvent`] pairs the dispatcher consumes, and runs the
//! async reader task that feeds them into the runtime channel.

mod async_service;
mod key_token;

pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;
use core_events::{Event, InputEvent};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}

/// Translate a single crossterm key event observed now.
pub fn translate_key(event: &crossterm::event::KeyEvent) -> Vec<InputEvent> {
    key_token::translate_key_event(event, Instant::now())
}
