//! Clipboard access and the transient "copied" indicator.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// How long the copied indicator stays on after a copy.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// A text clipboard.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str);
}

/// A clipboard that keeps the last written text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    content: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) {
        *self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
    }
}

/// Tracks when the last copy happened. Time is always passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn arm(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.copied_at = None;
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK)
    }
}
