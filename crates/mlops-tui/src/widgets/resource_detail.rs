//! Single resource: tab bar, Details and YAML views

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use serde_json::Value;

use mlops_app::state::{DetailTab, ResourceDetailState};
use mlops_core::{humanize_key, ResourceKind};

use super::remote_placeholder;
use crate::theme::styles;

pub struct ResourceDetail<'a> {
    kind: ResourceKind,
    name: &'a str,
    state: &'a ResourceDetailState,
}

impl<'a> ResourceDetail<'a> {
    pub fn new(kind: ResourceKind, name: &'a str, state: &'a ResourceDetailState) -> Self {
        Self { kind, name, state }
    }

    fn tab_bar(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for tab in DetailTab::available(self.kind) {
            let style = if *tab == self.state.tab {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            spans.push(Span::styled(format!(" {} ", tab.label()), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("t/←/→ switch", styles::text_muted()));
        Line::from(spans)
    }
}

/// Top-level keys as headed sections, values pretty-printed
fn details_lines(value: &Value) -> Vec<Line<'static>> {
    let Some(object) = value.as_object() else {
        return value_lines(value);
    };
    let mut lines = Vec::new();
    for (key, section) in object {
        lines.push(Line::from(Span::styled(humanize_key(key), styles::accent_bold())));
        lines.extend(value_lines(section).into_iter().map(|line| {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(line.spans);
            Line::from(spans)
        }));
        lines.push(Line::default());
    }
    lines
}

fn value_lines(value: &Value) -> Vec<Line<'static>> {
    let text = match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    text.lines().map(|l| Line::raw(l.to_string())).collect()
}

fn yaml_lines(value: &Value) -> Vec<Line<'static>> {
    match serde_yaml::to_string(value) {
        Ok(yaml) => yaml.lines().map(|l| Line::raw(l.to_string())).collect(),
        Err(e) => vec![Line::from(Span::styled(
            format!("Cannot render YAML: {e}"),
            styles::error(),
        ))],
    }
}

impl Widget for ResourceDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [tabs, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
        Paragraph::new(self.tab_bar()).render(tabs, buf);

        let block = styles::glass_block(true).title(format!(
            " {} / {} ",
            self.kind.title(),
            self.name
        ));
        let inner = block.inner(body);
        block.render(body, buf);

        if let Some(placeholder) = remote_placeholder(&self.state.data, self.name) {
            placeholder.render(inner, buf);
            return;
        }
        let Some(value) = self.state.data.data() else {
            return;
        };
        let lines = match self.state.tab {
            DetailTab::Details => details_lines(value),
            DetailTab::Yaml => yaml_lines(value),
            // Logs has its own route
            DetailTab::Logs => Vec::new(),
        };
        let scroll = self.state.scroll.min(u16::MAX as usize) as u16;
        Paragraph::new(lines).scroll((scroll, 0)).render(inner, buf);
    }
}
