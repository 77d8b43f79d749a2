use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Muted,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Short-lived messages shown at the bottom of the screen, one at a time.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: VecDeque<Toast>,
    current: Option<(Toast, Instant)>,
}

impl ToastQueue {
    pub fn push(&mut self, toast: Toast) {
        self.pending.push_back(toast);
    }

    /// Expires the shown toast and promotes the next one. Call once per tick.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.current {
            if now.duration_since(*shown_at) >= TOAST_DURATION {
                self.current = None;
            }
        }
        if self.current.is_none() {
            if let Some(next) = self.pending.pop_front() {
                self.current = Some((next, now));
            }
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref().map(|(t, _)| t)
    }
}
