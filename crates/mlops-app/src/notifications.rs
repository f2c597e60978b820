//! Transient status bar notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// At most this many notifications are kept; older ones are dropped first
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push_at(&mut self, level: NotificationLevel, text: impl Into<String>, now: Instant) {
        if self.items.len() == MAX_VISIBLE {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            text: text.into(),
            level,
            expires_at: now + self.ttl,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_at(NotificationLevel::Info, text, Instant::now());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push_at(NotificationLevel::Success, text, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_at(NotificationLevel::Error, text, Instant::now());
    }

    /// Drop expired notifications; returns `true` if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        self.items.len() != before
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
