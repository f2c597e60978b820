//! Status bar: newest notification, or key hints for the current view

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use mlops_app::notifications::Notifications;

use crate::theme::styles;

pub struct StatusBar<'a> {
    notifications: &'a Notifications,
    hints: &'a [(&'a str, &'a str)],
}

impl<'a> StatusBar<'a> {
    pub fn new(notifications: &'a Notifications, hints: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            notifications,
            hints,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.notifications.latest() {
            Some(n) => Line::from(Span::styled(
                format!(" {}", n.text),
                styles::notification(n.level),
            )),
            None => {
                let mut spans = vec![Span::raw(" ")];
                for (key, label) in self.hints {
                    spans.push(Span::styled(format!("[{key}]"), styles::keybinding()));
                    spans.push(Span::styled(format!(" {label}  "), styles::text_secondary()));
                }
                Line::from(spans)
            }
        };
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use mlops_app::notifications::NotificationLevel;
    use std::time::{Duration, Instant};

    #[test]
    fn test_shows_hints_without_notifications() {
        let mut term = TestTerminal::with_size(60, 1);
        let notifications = Notifications::new(Duration::from_secs(4));
        term.render_widget(
            StatusBar::new(&notifications, &[("q", "Quit"), ("r", "Refresh")]),
            term.area(),
        );
        assert!(term.buffer_contains("[q] Quit"));
        assert!(term.buffer_contains("[r] Refresh"));
    }

    #[test]
    fn test_notification_replaces_hints() {
        let mut term = TestTerminal::with_size(60, 1);
        let mut notifications = Notifications::new(Duration::from_secs(4));
        notifications.push_at(NotificationLevel::Error, "Network error", Instant::now());
        term.render_widget(StatusBar::new(&notifications, &[("q", "Quit")]), term.area());

        assert!(term.buffer_contains("Network error"));
        assert!(!term.buffer_contains("[q] Quit"));
    }
}
