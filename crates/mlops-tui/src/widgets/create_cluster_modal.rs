//! Create-cluster modal: form fields, then the creation task's progress

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use mlops_app::forms::ClusterField;
use mlops_app::state::CreateClusterModal;

use super::modal_overlay::{centered_rect, prepare_modal};
use super::TextArea;
use crate::theme::styles;

const FIELDS: [ClusterField; 4] = [
    ClusterField::Name,
    ClusterField::NodeVersion,
    ClusterField::Workers,
    ClusterField::Config,
];

pub struct CreateClusterView<'a> {
    modal: &'a CreateClusterModal,
}

impl<'a> CreateClusterView<'a> {
    pub fn new(modal: &'a CreateClusterModal) -> Self {
        Self { modal }
    }

    fn footer(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(task) = &self.modal.status {
            let (icon, style) = styles::task_status(task.status);
            let mut spans = vec![Span::styled(format!("{icon} Task {}", task.status), style)];
            if let Some(result) = &task.result {
                spans.push(Span::styled(format!(": {result}"), styles::text_secondary()));
            }
            lines.push(Line::from(spans));
        } else if self.modal.submitting {
            lines.push(Line::from(Span::styled(
                "Submitting…",
                styles::text_secondary(),
            )));
        }
        if let Some(error) = &self.modal.error {
            lines.push(Line::from(Span::styled(error.clone(), styles::error())));
        }

        let hint = if self.modal.is_busy() {
            "Creating cluster · Esc closes and stops tracking"
        } else if self.modal.form.can_submit() {
            "Tab next field · Ctrl+S create · Esc cancel"
        } else {
            "Tab next field · name is required · Esc cancel"
        };
        lines.push(Line::from(Span::styled(hint, styles::text_muted())));
        lines
    }
}

impl Widget for CreateClusterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect(70, 24, area);
        prepare_modal(buf, area, modal);

        let block = styles::modal_block(" Create cluster ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [name, version, workers, config, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .areas(inner);

        let form = &self.modal.form;
        let busy = self.modal.is_busy();
        for (field, rect) in FIELDS.into_iter().zip([name, version, workers, config]) {
            TextArea::new(form.field(field), field.label())
                .focused(!busy && form.focus == field)
                .render(rect, buf);
        }

        Paragraph::new(self.footer())
            .wrap(Wrap { trim: true })
            .render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use mlops_core::{Task, TaskStatus};

    #[test]
    fn test_form_labels() {
        let mut term = TestTerminal::with_size(100, 30);
        let modal = CreateClusterModal::new();
        term.render_widget(CreateClusterView::new(&modal), term.area());

        assert!(term.buffer_contains("Create cluster"));
        for field in FIELDS {
            assert!(term.buffer_contains(field.label()), "{}", field.label());
        }
        assert!(term.buffer_contains("name is required"));
    }

    #[test]
    fn test_shows_task_status_and_result() {
        let mut term = TestTerminal::with_size(100, 30);
        let mut modal = CreateClusterModal::new();
        modal.status = Some(Task {
            status: TaskStatus::Failed,
            result: Some("kind exited with 1".into()),
        });
        term.render_widget(CreateClusterView::new(&modal), term.area());

        assert!(term.buffer_contains("Task failed: kind exited with 1"));
    }
}
