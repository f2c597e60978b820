//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use mlops_app::notifications::NotificationLevel;
use mlops_core::TaskStatus;

use super::palette;

pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - used for focused+selected items across widgets
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn cursor_row() -> Style {
    Style::default().bg(palette::SELECTED_ROW_BG)
}

pub fn glass_block<'a>(focused: bool) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(palette::BORDER_ACTIVE)
        } else {
            Style::default().fg(palette::BORDER_DIM)
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::BORDER_ACTIVE))
        .style(Style::default().bg(palette::POPUP_BG))
}

pub fn notification(level: NotificationLevel) -> Style {
    match level {
        NotificationLevel::Info => Style::default().fg(palette::STATUS_BLUE),
        NotificationLevel::Success => Style::default().fg(palette::STATUS_GREEN),
        NotificationLevel::Error => error().add_modifier(Modifier::BOLD),
    }
}

/// Icon and style for a task status
pub fn task_status(status: TaskStatus) -> (&'static str, Style) {
    match status {
        TaskStatus::Queued => ("○", text_muted()),
        TaskStatus::InProgress => ("◐", Style::default().fg(palette::STATUS_YELLOW)),
        TaskStatus::Completed => ("●", Style::default().fg(palette::STATUS_GREEN)),
        TaskStatus::Failed => ("✗", error()),
    }
}
