//! Pod log viewer

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use mlops_app::log_stream::{LogStreamState, StreamStatus};

use crate::theme::{palette, styles};

pub struct LogView<'a> {
    pod: &'a str,
    state: &'a LogStreamState,
}

impl<'a> LogView<'a> {
    pub fn new(pod: &'a str, state: &'a LogStreamState) -> Self {
        Self { pod, state }
    }

    fn status_line(&self) -> Line<'static> {
        let (text, style) = match self.state.status() {
            StreamStatus::Idle => ("idle".to_string(), styles::text_muted()),
            StreamStatus::Connecting => (
                "connecting…".to_string(),
                Style::default().fg(palette::STATUS_YELLOW),
            ),
            StreamStatus::Streaming => (
                "streaming".to_string(),
                Style::default().fg(palette::STATUS_GREEN),
            ),
            StreamStatus::Ended => ("ended".to_string(), styles::text_secondary()),
            StreamStatus::Failed(e) => (format!("failed: {e}"), styles::error()),
        };
        let follow = self.state.request().is_some_and(|r| r.follow);
        Line::from(vec![
            Span::styled(format!("● {text}"), style),
            Span::styled(
                format!(
                    "  {} lines · follow {} · auto-scroll {}",
                    self.state.lines().len(),
                    if follow { "on" } else { "off" },
                    if self.state.auto_scroll { "on" } else { "off" },
                ),
                styles::text_muted(),
            ),
        ])
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
        Paragraph::new(self.status_line()).render(status, buf);

        let block = styles::glass_block(true).title(format!(" Logs: {} ", self.pod));
        let inner = block.inner(body);
        block.render(body, buf);

        let lines = self.state.lines();
        if lines.is_empty() {
            Paragraph::new(Span::styled("No log output yet.", styles::text_muted()))
                .render(inner, buf);
            return;
        }
        let visible = inner.height as usize;
        let shown: Vec<Line> = lines
            .iter()
            .skip(self.state.offset(visible))
            .take(visible)
            .map(|l| Line::raw(l.as_str()))
            .collect();
        Paragraph::new(shown).render(inner, buf);
    }
}

/// Rows available for log lines inside `body`
pub fn log_rows(body: Rect) -> usize {
    // status line plus block borders
    body.height.saturating_sub(3) as usize
}
