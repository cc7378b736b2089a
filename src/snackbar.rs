use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
    pub kind: NoticeKind,
}

/// Shared queue of transient messages. Screens push, the front-end drains.
#[derive(Clone, Default)]
pub struct Snackbar {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl Snackbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: impl Into<String>, duration: Duration) {
        self.push(message.into(), duration, NoticeKind::Info);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message.into(), DEFAULT_DURATION, NoticeKind::Error);
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.queue
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    fn push(&self, message: String, duration: Duration, kind: NoticeKind) {
        info!("snackbar: {}", message);
        if let Ok(mut q) = self.queue.lock() {
            q.push_back(Notice {
                message,
                duration,
                kind,
            });
        }
    }
}
