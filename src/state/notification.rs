/// Toast-style notifications: fire-and-forget, auto-closed after a number
/// of ticks, dismissed early by any key press.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub close_tick: Option<u64>,
}

#[derive(Default)]
pub struct NotificationState {
    pub current: Option<Notification>,
}

impl NotificationState {
    pub fn set(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        close_tick: Option<u64>,
    ) {
        self.current = Some(Notification {
            kind,
            message: message.into(),
            close_tick,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn should_close(&self, tick_count: u64) -> bool {
        matches!(&self.current, Some(n) if n.close_tick.is_some_and(|t| tick_count >= t))
    }
}
