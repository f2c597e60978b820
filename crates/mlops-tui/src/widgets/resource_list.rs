//! Kubernetes resource table with columns derived from the first item

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, Widget},
};

use mlops_app::state::ResourceListState;
use mlops_core::{humanize_key, ResourceKind, ResourceList};

use super::remote_placeholder;
use crate::layout::inner_rows;
use crate::theme::styles;

/// Longest cell text before truncation
const MAX_CELL_WIDTH: usize = 40;

pub struct ResourceTable<'a> {
    kind: ResourceKind,
    state: &'a ResourceListState,
}

impl<'a> ResourceTable<'a> {
    pub fn new(kind: ResourceKind, state: &'a ResourceListState) -> Self {
        Self { kind, state }
    }

    fn title(&self, count: usize) -> String {
        let mut title = format!(" {} ({count}) ", self.kind.title());
        if self.kind.supports_all_namespaces() {
            let scope = if self.state.all_namespaces {
                "all namespaces"
            } else {
                "default namespace"
            };
            title.push_str(&format!("· {scope} [a] "));
        }
        title
    }
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

impl Widget for ResourceTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let list = self.state.data.data();
        let count = list.map_or(0, |l| l.items.len());
        let block = styles::glass_block(true).title(self.title(count));
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(placeholder) = remote_placeholder(&self.state.data, self.kind.as_str()) {
            placeholder.render(inner, buf);
            return;
        }
        let Some(list) = list.filter(|l| !l.items.is_empty()) else {
            Paragraph::new(Span::styled(
                format!("No {} found.", self.kind.as_str()),
                styles::text_muted(),
            ))
            .render(inner, buf);
            return;
        };

        let columns = list.columns();
        let show_namespace = self.kind.supports_all_namespaces() && self.state.all_namespaces;
        let mut header: Vec<String> = columns.iter().map(|c| humanize_key(c)).collect();
        if show_namespace && !columns.iter().any(|c| c == "namespace") {
            header.insert(0, "Namespace".to_string());
        }
        let namespace_column = header.len() > columns.len();

        let rows_fit = inner_rows(area).saturating_sub(1).max(1);
        let offset = self.state.cursor.saturating_sub(rows_fit - 1);
        let rows: Vec<Row> = list
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows_fit)
            .map(|(i, item)| {
                let mut cells: Vec<Cell> = Vec::with_capacity(header.len());
                if namespace_column {
                    cells.push(Cell::from(
                        ResourceList::item_namespace(item).unwrap_or("-").to_string(),
                    ));
                }
                cells.extend(
                    columns
                        .iter()
                        .map(|key| Cell::from(truncate(ResourceList::cell(item, key)))),
                );
                let row = Row::new(cells);
                if i == self.state.cursor {
                    row.style(styles::cursor_row())
                } else {
                    row.style(styles::text_primary())
                }
            })
            .collect();

        let widths = vec![Constraint::Fill(1); header.len()];
        Table::new(rows, widths)
            .header(Row::new(header).style(styles::accent_bold()))
            .column_spacing(2)
            .render(inner, buf);
    }
}
