//! New code form

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Paragraph, Widget},
};

use mlops_app::forms::{CodeCreateField, CodeCreateForm};

use super::TextArea;
use crate::theme::styles;

pub struct CodeCreate<'a> {
    form: &'a CodeCreateForm,
}

impl<'a> CodeCreate<'a> {
    pub fn new(form: &'a CodeCreateForm) -> Self {
        Self { form }
    }
}

impl Widget for CodeCreate<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [name_area, content_area, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        TextArea::new(&self.form.name, "Name")
            .focused(self.form.focus == CodeCreateField::Name)
            .render(name_area, buf);
        TextArea::new(&self.form.content, "Content")
            .focused(self.form.focus == CodeCreateField::Content)
            .render(content_area, buf);

        let footer_text = if self.form.submitting {
            Span::styled(" Creating…", styles::text_secondary())
        } else if let Some(error) = &self.form.error {
            Span::styled(format!(" {error}"), styles::error())
        } else {
            Span::styled(
                " Tab switch field · Ctrl+S create · Esc cancel",
                styles::text_muted(),
            )
        };
        Paragraph::new(footer_text).render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_new_form_shows_default_content() {
        let mut term = TestTerminal::new();
        let form = CodeCreateForm::new();
        term.render_widget(CodeCreate::new(&form), term.area());

        assert!(term.buffer_contains("Name"));
        assert!(term.buffer_contains("# Enter your Python code here"));
    }

    #[test]
    fn test_validation_error_shown() {
        let mut term = TestTerminal::new();
        let mut form = CodeCreateForm::new();
        form.error = Some("Name is required".into());
        term.render_widget(CodeCreate::new(&form), term.area());

        assert!(term.buffer_contains("Name is required"));
    }
}
