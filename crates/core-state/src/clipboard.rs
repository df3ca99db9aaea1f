//! Clipboard capability and the editor operations built on it.
//!
//! The editor never assumes a backend. Hosts inject any [`Clipboard`]; the
//! in-process [`MemoryClipboard`] is the default. Backend failures are logged and
//! turn the requesting operation into a no-op.

use crate::Editor;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard holds no text")]
    Empty,
}

pub trait Clipboard {
    fn get_text(&self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Result<String, ClipboardError> {
        self.contents.clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_owned());
        Ok(())
    }
}

impl Editor {
    /// Copy the selected text. False when nothing is selected or the backend fails.
    pub fn copy_selection(&mut self) -> bool {
        let Some(text) = self.selection_text() else {
            return false;
        };
        match self.clipboard.set_text(&text) {
            Ok(()) => {
                debug!(target: "state.clipboard", len = text.chars().count(), "copy");
                true
            }
            Err(e) => {
                warn!(target: "state.clipboard", error = %e, "copy_failed");
                false
            }
        }
    }

    /// Copy then delete the selection. The delete is skipped when the copy fails.
    pub fn cut_selection(&mut self) -> bool {
        if !self.copy_selection() {
            return false;
        }
        self.backspace_or_delete_selection(true)
    }

    /// Insert the clipboard text at the caret (replacing any selection).
    pub fn paste_clipboard(&mut self) -> bool {
        match self.clipboard.get_text() {
            Ok(text) if !text.is_empty() => {
                debug!(target: "state.clipboard", len = text.chars().count(), "paste");
                self.insert_text(&text)
            }
            Ok(_) => false,
            Err(ClipboardError::Empty) => false,
            Err(e) => {
                warn!(target: "state.clipboard", error = %e, "paste_failed");
                false
            }
        }
    }
}
