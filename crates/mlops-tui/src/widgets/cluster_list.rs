//! Cluster list

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use mlops_app::state::ClusterListState;

use super::remote_placeholder;
use crate::theme::styles;

pub struct ClusterList<'a> {
    state: &'a ClusterListState,
}

impl<'a> ClusterList<'a> {
    pub fn new(state: &'a ClusterListState) -> Self {
        Self { state }
    }
}

impl Widget for ClusterList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.state.data.data().map_or(0, Vec::len);
        let block = styles::glass_block(self.state.create.is_none())
            .title(format!(" Clusters ({count}) "));
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(placeholder) = remote_placeholder(&self.state.data, "clusters") {
            placeholder.render(inner, buf);
            return;
        }
        let clusters = self.state.data.data().map(Vec::as_slice).unwrap_or_default();
        if clusters.is_empty() {
            Paragraph::new(Span::styled(
                "No clusters. Press c to create one.",
                styles::text_muted(),
            ))
            .render(inner, buf);
            return;
        }

        let rows = inner.height as usize;
        let offset = self.state.cursor.saturating_sub(rows.saturating_sub(1));
        let lines: Vec<Line> = clusters
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(i, cluster)| {
                if i == self.state.cursor {
                    Line::from(Span::styled(
                        format!("▸ {}", cluster.name),
                        styles::focused_selected(),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {}", cluster.name),
                        styles::text_primary(),
                    ))
                }
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
