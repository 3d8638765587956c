use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

impl NotificationLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "󰋼",
            NotificationLevel::Error => "󰅚",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    expires_at: Instant,
}

/// Short-lived toasts drawn over the control panel, newest last.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: NotificationLevel, text: impl Into<String>, ttl: Duration) {
        self.notifications.push(Notification {
            level,
            text: text.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Info, text, Duration::from_secs(2));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Error, text, Duration::from_secs(5));
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.notifications.retain(|n| n.expires_at > now);
    }

    pub fn active_notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.notifications.last()
    }
}
