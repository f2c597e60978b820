//! Code list: search box, selectable table, bulk-delete state

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Widget},
};

use mlops_app::state::CodeListState;
use mlops_core::timestamp;

use super::{remote_placeholder, TextArea};
use crate::layout::inner_rows;
use crate::theme::styles;

pub struct CodeList<'a> {
    state: &'a CodeListState,
    searching: bool,
}

impl<'a> CodeList<'a> {
    pub fn new(state: &'a CodeListState) -> Self {
        Self {
            state,
            searching: false,
        }
    }

    pub fn searching(mut self, searching: bool) -> Self {
        self.searching = searching;
        self
    }
}

impl Widget for CodeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [search_area, table_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

        TextArea::new(&self.state.search, "Search")
            .focused(self.searching)
            .placeholder("press / to filter by name")
            .render(search_area, buf);

        let visible = self.state.visible();
        let mut title = format!(" Codes ({}) ", visible.len());
        if !self.state.selection.is_empty() {
            title.push_str(&format!("· {} selected ", self.state.selection.len()));
        }
        if self.state.deleting {
            title.push_str("· deleting… ");
        }
        let block = styles::glass_block(!self.searching).title(title);
        let inner = block.inner(table_area);
        block.render(table_area, buf);

        if let Some(placeholder) = remote_placeholder(&self.state.data, "codes") {
            placeholder.render(inner, buf);
            return;
        }
        if visible.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No codes. Press n to create one.",
                styles::text_muted(),
            )))
            .render(inner, buf);
            return;
        }

        // Header row takes one line
        let rows_fit = inner_rows(table_area).saturating_sub(1).max(1);
        let offset = self.state.cursor.saturating_sub(rows_fit - 1);
        let rows: Vec<Row> = visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows_fit)
            .map(|(i, code)| {
                let mark = if self.state.selection.contains(code.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let row = Row::new(vec![
                    Cell::from(mark),
                    Cell::from(code.id.to_string()),
                    Cell::from(code.name.clone()),
                    Cell::from(code.versions.len().to_string()),
                    Cell::from(timestamp::display(&code.updated_at)),
                ]);
                if i == self.state.cursor {
                    row.style(styles::cursor_row())
                } else {
                    row
                }
            })
            .collect();

        let header = Row::new(vec!["", "ID", "Name", "Versions", "Updated"])
            .style(styles::accent_bold());
        Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(12),
                Constraint::Length(8),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .column_spacing(2)
        .render(inner, buf);

        if let Some(error) = self.state.data.error() {
            let bottom = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
            Paragraph::new(Span::styled(error.to_string(), styles::error())).render(bottom, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{loaded, sample_code, TestTerminal};

    fn list_state() -> CodeListState {
        let mut other = sample_code(2);
        other.name = "eval.py".into();
        CodeListState {
            data: loaded(vec![sample_code(1), other]),
            ..Default::default()
        }
    }

    #[test]
    fn test_renders_codes() {
        let mut term = TestTerminal::new();
        let state = list_state();
        term.render_widget(CodeList::new(&state), term.area());

        assert!(term.buffer_contains("Codes (2)"));
        assert!(term.buffer_contains("train.py"));
        assert!(term.buffer_contains("eval.py"));
    }

    #[test]
    fn test_marks_selected_rows() {
        let mut term = TestTerminal::new();
        let mut state = list_state();
        state.selection.toggle(2);
        term.render_widget(CodeList::new(&state), term.area());

        assert!(term.buffer_contains("1 selected"));
        assert!(term.buffer_contains("[x]"));
    }

    #[test]
    fn test_search_filters_rows() {
        let mut term = TestTerminal::new();
        let mut state = list_state();
        state.search.set_text("EVAL");
        term.render_widget(CodeList::new(&state), term.area());

        assert!(term.buffer_contains("Codes (1)"));
        assert!(!term.buffer_contains("train.py"));
    }

    #[test]
    fn test_loading_placeholder() {
        let mut term = TestTerminal::new();
        let mut state = CodeListState::default();
        state.data.request(Some("codes".into()));
        term.render_widget(CodeList::new(&state), term.area());

        assert!(term.buffer_contains("Loading codes"));
    }
}
