//! Transient toasts shown after commands finish.
//!
//! The service never reads the clock itself; callers pass `now` so expiry
//! and fading are deterministic.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays fully opaque.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(5);
/// Fade-out that follows [`DISPLAY_DURATION`].
pub const FADE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone)]
struct Notification {
    id: NotificationId,
    message: String,
    kind: NotificationKind,
    shown_at: Instant,
}

/// A live toast as it should be drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleNotification<'a> {
    pub id: NotificationId,
    pub message: &'a str,
    pub kind: NotificationKind,
    /// 1.0 while fully shown, falling linearly to 0.0 during the fade.
    pub opacity: f32,
}

#[derive(Debug)]
pub struct NotificationService {
    queue: VecDeque<Notification>,
    max_visible: usize,
    next_id: u64,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(5)
    }
}

impl NotificationService {
    pub fn new(max_visible: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_visible: max_visible.max(1),
            next_id: 0,
        }
    }

    /// Queue a toast. The oldest one is dropped when the stack is full.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        if self.queue.len() == self.max_visible {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            id,
            message: message.into(),
            kind,
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: NotificationId) {
        self.queue.retain(|n| n.id != id);
    }

    /// Toasts still on screen at `now`, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<VisibleNotification<'_>> {
        self.queue
            .iter()
            .filter_map(|n| {
                let opacity = opacity(now.saturating_duration_since(n.shown_at))?;
                Some(VisibleNotification {
                    id: n.id,
                    message: &n.message,
                    kind: n.kind,
                    opacity,
                })
            })
            .collect()
    }

    /// Drop toasts whose fade has finished.
    pub fn prune(&mut self, now: Instant) {
        self.queue
            .retain(|n| opacity(now.saturating_duration_since(n.shown_at)).is_some());
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

fn opacity(age: Duration) -> Option<f32> {
    if age < DISPLAY_DURATION {
        return Some(1.0);
    }
    let fading = age - DISPLAY_DURATION;
    if fading >= FADE_DURATION {
        return None;
    }
    Some(1.0 - fading.as_secs_f32() / FADE_DURATION.as_secs_f32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_stay_opaque_then_fade_and_expire() {
        let t0 = Instant::now();
        let mut service = NotificationService::default();
        service.show("Saved", NotificationKind::Success, t0);

        let at = |ms: u64| t0 + Duration::from_millis(ms);
        assert_eq!(service.visible(at(4_999))[0].opacity, 1.0);

        let fading = service.visible(at(5_150))[0].opacity;
        assert!((fading - 0.5).abs() < 1e-3, "opacity {fading}");

        assert!(service.visible(at(5_300)).is_empty());
        assert!(!service.is_empty());
        service.prune(at(5_300));
        assert!(service.is_empty());
    }

    #[test]
    fn prune_keeps_live_toasts() {
        let t0 = Instant::now();
        let mut service = NotificationService::default();
        service.show("old", NotificationKind::Info, t0);
        service.show("new", NotificationKind::Error, t0 + Duration::from_secs(4));

        service.prune(t0 + Duration::from_secs(6));
        let visible = service.visible(t0 + Duration::from_secs(6));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "new");
        assert_eq!(visible[0].kind, NotificationKind::Error);
    }

    #[test]
    fn full_stack_drops_the_oldest() {
        let t0 = Instant::now();
        let mut service = NotificationService::new(2);
        service.show("a", NotificationKind::Info, t0);
        service.show("b", NotificationKind::Info, t0);
        service.show("c", NotificationKind::Warning, t0);

        let messages: Vec<_> = service.visible(t0).iter().map(|n| n.message).collect();
        assert_eq!(messages, ["b", "c"]);
    }

    #[test]
    fn dismiss_removes_one_toast() {
        let t0 = Instant::now();
        let mut service = NotificationService::default();
        let first = service.show("a", NotificationKind::Info, t0);
        service.show("b", NotificationKind::Info, t0);
        service.dismiss(first);
        assert_eq!(service.visible(t0)[0].message, "b");
    }
}
