//! Version diff modal

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use mlops_app::diff::{DiffTag, VersionDiffState};
use mlops_core::Code;

use super::modal_overlay::{centered_rect_percent, prepare_modal};
use crate::theme::{palette, styles};

pub struct DiffModal<'a> {
    code: &'a Code,
    diff: &'a VersionDiffState,
}

impl<'a> DiffModal<'a> {
    pub fn new(code: &'a Code, diff: &'a VersionDiffState) -> Self {
        Self { code, diff }
    }

    fn version_label(&self, index: usize) -> String {
        self.code
            .versions
            .get(index)
            .map(|v| v.label())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Widget for DiffModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect_percent(90, 85, area);
        prepare_modal(buf, area, modal);

        let block = styles::modal_block(" Compare versions ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [selectors, body] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("[o] old: ", styles::keybinding()),
                Span::styled(self.version_label(self.diff.old_index), styles::text_primary()),
                Span::raw("    "),
                Span::styled("[n] new: ", styles::keybinding()),
                Span::styled(self.version_label(self.diff.new_index), styles::text_primary()),
            ]),
            Line::from(Span::styled(
                "O/N cycle back · ↑↓ scroll · Esc close",
                styles::text_muted(),
            )),
        ])
        .render(selectors, buf);

        let rows = body.height as usize;
        let lines: Vec<Line> = self
            .diff
            .lines(self.code)
            .into_iter()
            .skip(self.diff.scroll)
            .take(rows)
            .map(|l| {
                let style = match l.tag {
                    DiffTag::Equal => styles::text_secondary(),
                    DiffTag::Insert => Style::default().fg(palette::DIFF_INSERT),
                    DiffTag::Delete => Style::default().fg(palette::DIFF_DELETE),
                };
                Line::from(Span::styled(format!("{} {}", l.tag.sign(), l.text), style))
            })
            .collect();
        Paragraph::new(lines).render(body, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_code, TestTerminal};

    #[test]
    fn test_diff_of_last_two_versions() {
        let mut term = TestTerminal::with_size(100, 30);
        let code = sample_code(1);
        let diff = VersionDiffState::for_code(&code).unwrap();
        term.render_widget(DiffModal::new(&code, &diff), term.area());

        assert!(term.buffer_contains("Compare versions"));
        assert!(term.buffer_contains("- print(1)"));
        assert!(term.buffer_contains("+ print(2)"));
        assert!(term.buffer_contains("+ print(3)"));
    }
}
