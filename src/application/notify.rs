//! Transient toast notifications.
//!
//! A toast stays fully visible for [`TOAST_VISIBLE`], fades for
//! [`TOAST_FADE`] and is then dropped. Nothing is ever returned to the
//! caller: notifying is fire-and-forget.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast is shown at full strength.
pub const TOAST_VISIBLE: Duration = Duration::from_millis(2400);

/// Length of the fade-out after the visible window.
pub const TOAST_FADE: Duration = Duration::from_millis(300);

/// Upper bound on queued toasts; the oldest are dropped first.
const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    created_at: Instant,
}

impl Toast {
    /// Phase at `now`, or `None` once the toast has expired.
    #[must_use]
    pub fn phase(&self, now: Instant) -> Option<ToastPhase> {
        let age = now.saturating_duration_since(self.created_at);
        if age < TOAST_VISIBLE {
            Some(ToastPhase::Visible)
        } else if age < TOAST_VISIBLE + TOAST_FADE {
            Some(ToastPhase::Fading)
        } else {
            None
        }
    }
}

/// Queue of live toasts.
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` now.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notify_at(message, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::info!(toast = %message, "notify");

        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            message,
            created_at: now,
        });
    }

    /// Drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| t.phase(now).is_some());
    }

    /// Live toasts, newest last.
    pub fn live(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.toasts
            .iter()
            .filter_map(move |t| t.phase(now).map(|phase| (t, phase)))
    }

    /// Most recent live toast.
    #[must_use]
    pub fn latest(&self, now: Instant) -> Option<(&Toast, ToastPhase)> {
        self.live(now).last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_lifecycle() {
        let start = Instant::now();
        let mut toasts = Notifications::new();
        toasts.notify_at("Patient created successfully", start);

        let (toast, phase) = toasts.latest(start).expect("Should be live");
        assert_eq!(toast.message, "Patient created successfully");
        assert_eq!(phase, ToastPhase::Visible);

        let fading = start + TOAST_VISIBLE + Duration::from_millis(100);
        assert_eq!(toasts.latest(fading).map(|(_, p)| p), Some(ToastPhase::Fading));

        let gone = start + TOAST_VISIBLE + TOAST_FADE;
        assert!(toasts.latest(gone).is_none());
        toasts.tick(gone);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_latest_is_newest() {
        let start = Instant::now();
        let mut toasts = Notifications::new();
        toasts.notify_at("first", start);
        toasts.notify_at("second", start + Duration::from_millis(10));

        let now = start + Duration::from_millis(20);
        assert_eq!(toasts.live(now).count(), 2);
        assert_eq!(toasts.latest(now).map(|(t, _)| t.message.as_str()), Some("second"));
    }

    #[test]
    fn test_queue_is_bounded() {
        let start = Instant::now();
        let mut toasts = Notifications::new();
        for i in 0..20 {
            toasts.notify_at(format!("toast {i}"), start);
        }
        assert_eq!(toasts.live(start).count(), MAX_TOASTS);
        assert_eq!(toasts.latest(start).map(|(t, _)| t.message.as_str()), Some("toast 19"));
    }
}
