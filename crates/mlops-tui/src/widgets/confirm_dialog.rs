//! Confirmation dialog widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use mlops_app::confirm_dialog::ConfirmDialogState;

use super::modal_overlay::{centered_rect, prepare_modal};
use crate::theme::styles;

pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmDialogState) -> Self {
        Self { state }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect(56, 8, area);
        prepare_modal(buf, area, modal);

        let title = format!(" {} ", self.state.title);
        let block = styles::modal_block(&title);
        let inner = block.inner(modal);
        block.render(modal, buf);

        let mut options = Vec::new();
        for (i, (label, _)) in self.state.options.iter().enumerate() {
            let style = if i == self.state.selected {
                styles::focused_selected()
            } else {
                styles::text_secondary()
            };
            options.push(Span::styled(format!(" {label} "), style));
            options.push(Span::raw("   "));
        }

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.state.message.as_str(),
                styles::text_primary(),
            )),
            Line::from(""),
            Line::from(options),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_delete_codes_dialog() {
        let mut term = TestTerminal::new();
        let state = ConfirmDialogState::delete_codes(2);
        term.render_widget(ConfirmDialog::new(&state), term.area());

        assert!(term.buffer_contains("Delete codes"));
        assert!(term.buffer_contains("delete 2 selected codes"));
        assert!(term.buffer_contains("Delete"));
        assert!(term.buffer_contains("Cancel"));
    }
}
