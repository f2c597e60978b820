//! Code detail: version chain selectors, script editor, parsed result panel

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use mlops_app::state::{CodeDetailState, UiMode};
use mlops_core::{timestamp, Code, ParsedContent};

use super::{remote_placeholder, TextArea};
use crate::theme::{palette, styles};

/// Rows the parsed panel keeps even when the editor wants more
const MIN_PARSED_ROWS: u16 = 8;

pub struct CodeDetail<'a> {
    state: &'a CodeDetailState,
    mode: UiMode,
}

impl<'a> CodeDetail<'a> {
    pub fn new(state: &'a CodeDetailState, mode: UiMode) -> Self {
        Self { state, mode }
    }

    fn title_line(&self, code: &Code) -> Line<'static> {
        Line::from(vec![
            Span::styled(code.name.clone(), styles::accent_bold()),
            Span::styled(format!("  #{}", code.id), styles::text_muted()),
            Span::styled(
                format!(
                    "  created {} · updated {}",
                    timestamp::display(&code.created_at),
                    timestamp::display(&code.updated_at)
                ),
                styles::text_secondary(),
            ),
        ])
    }

    /// `label: a  [b]  c` with the selected entry highlighted
    fn chooser(
        label: &'static str,
        keys: &'static str,
        entries: Vec<(String, bool)>,
        empty: &'static str,
    ) -> Line<'static> {
        let mut spans = vec![
            Span::styled(format!("{label} "), styles::text_secondary()),
            Span::styled(format!("{keys} "), styles::keybinding()),
        ];
        if entries.is_empty() {
            spans.push(Span::styled(empty, styles::text_muted()));
        }
        for (text, selected) in entries {
            let style = if selected {
                styles::focused_selected()
            } else {
                styles::text_primary()
            };
            spans.push(Span::styled(format!(" {text} "), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn version_line(&self, code: &Code) -> Line<'static> {
        let selected = self.state.selection.version_id;
        let entries = code
            .versions
            .iter()
            .map(|v| (format!("v{}", v.version), Some(v.id) == selected))
            .collect();
        Self::chooser("Version", "[ ]", entries, "no versions")
    }

    fn parsing_lines(&self, code: &Code) -> Vec<Line<'static>> {
        let selection = &self.state.selection;
        let results = selection
            .version(code)
            .map(|v| {
                v.parsing_results
                    .iter()
                    .map(|r| (r.name.clone(), Some(r.id) == selection.parsing_result_id))
                    .collect()
            })
            .unwrap_or_default();
        let result_versions = selection
            .parsing_result(code)
            .map(|r| {
                r.versions
                    .iter()
                    .map(|v| {
                        (
                            format!("v{}", v.version),
                            Some(v.id) == selection.parsing_result_version_id,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        vec![
            Self::chooser("Parsing result", "{ }", results, "none (p to parse)"),
            Self::chooser("Result version", "< >", result_versions, "-"),
        ]
    }

    fn render_parsed(&self, code: &Code, area: Rect, buf: &mut Buffer) {
        let selection = &self.state.selection;
        if self.mode == UiMode::EditJson || selection.editing_json {
            let [editor, error] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
            TextArea::new(&selection.json, "Parsed content (JSON) · Ctrl+S save · Esc cancel")
                .focused(self.mode == UiMode::EditJson)
                .render(editor, buf);
            if let Some(e) = &self.state.json_error {
                Paragraph::new(Span::styled(e.clone(), styles::error())).render(error, buf);
            }
            return;
        }

        let block = styles::glass_block(false).title(" Parsed content ");
        let inner = block.inner(area);
        block.render(area, buf);
        match selection.parsing_result_version(code) {
            Some(prv) => Paragraph::new(parsed_fields(&prv.content))
                .wrap(Wrap { trim: false })
                .render(inner, buf),
            None => Paragraph::new(Span::styled(
                "No parsing result for this version.",
                styles::text_muted(),
            ))
            .render(inner, buf),
        }
    }
}

fn parsed_fields(content: &ParsedContent) -> Vec<Line<'static>> {
    let label = Style::default().fg(palette::ACCENT);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", label),
            Span::raw(content.name.clone()),
        ]),
        Line::from(vec![
            Span::styled("Framework: ", label),
            Span::raw(content.framework_display().to_string()),
        ]),
        Line::from(Span::styled("Metric:", label)),
    ];
    lines.extend(content.metric_display().lines().map(|l| Line::raw(l.to_string())));
    for (title, block) in [
        ("Parameter:", &content.parameter),
        ("Model block:", &content.model_block),
        ("Data block:", &content.data_block),
    ] {
        lines.push(Line::from(Span::styled(title, label)));
        lines.extend(block.lines().map(|l| Line::raw(l.to_string())));
    }
    lines
}

impl Widget for CodeDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(code) = self.state.code() else {
            let placeholder = remote_placeholder(&self.state.data, "code")
                .unwrap_or_else(|| Paragraph::new("Code not found."));
            placeholder.render(area, buf);
            return;
        };

        let editor_rows = self
            .state
            .editor_rows()
            .min(area.height.saturating_sub(MIN_PARSED_ROWS + 6))
            .max(3);
        let title_height = if self.mode == UiMode::Rename { 3 } else { 1 };
        let [title, versions, editor, parsing, parsed] = Layout::vertical([
            Constraint::Length(title_height),
            Constraint::Length(1),
            Constraint::Length(editor_rows + 2),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .areas(area);

        if self.mode == UiMode::Rename {
            TextArea::new(&self.state.rename, "Rename · Enter save · Esc cancel")
                .focused(true)
                .render(title, buf);
        } else {
            Paragraph::new(self.title_line(code)).render(title, buf);
        }
        Paragraph::new(self.version_line(code)).render(versions, buf);

        let mut editor_title = String::from(" Content ");
        if self.state.selection.content.is_dirty() {
            editor_title.push_str("· modified (Ctrl+S saves a new version) ");
        }
        if self.state.saving {
            editor_title.push_str("· saving… ");
        }
        TextArea::new(&self.state.selection.content, &editor_title)
            .focused(self.mode == UiMode::EditContent)
            .render(editor, buf);

        Paragraph::new(self.parsing_lines(code)).render(parsing, buf);
        self.render_parsed(code, parsed, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{loaded, sample_code, TestTerminal};
    use mlops_app::code_detail::Reselect;
    use mlops_app::config::Settings;

    fn detail_state() -> CodeDetailState {
        let code = sample_code(1);
        let mut state = CodeDetailState::new(&Settings::default());
        state.selection.apply(&code, Reselect::Latest);
        state.data = loaded(code);
        state
    }

    #[test]
    fn test_shows_latest_version_and_parsed_fields() {
        let mut term = TestTerminal::with_size(100, 40);
        let state = detail_state();
        term.render_widget(CodeDetail::new(&state, UiMode::Normal), term.area());

        assert!(term.buffer_contains("train.py"));
        assert!(term.buffer_contains("v2"));
        assert!(term.buffer_contains("print(3)"));
        assert!(term.buffer_contains("Parsing Result v1"));
        assert!(term.buffer_contains("Framework: torch"));
    }

    #[test]
    fn test_rename_mode_shows_input() {
        let mut term = TestTerminal::with_size(100, 40);
        let mut state = detail_state();
        state.rename.set_text("renamed.py");
        term.render_widget(CodeDetail::new(&state, UiMode::Rename), term.area());

        assert!(term.buffer_contains("Rename"));
        assert!(term.buffer_contains("renamed.py"));
    }

    #[test]
    fn test_json_error_shown_while_editing() {
        let mut term = TestTerminal::with_size(100, 40);
        let mut state = detail_state();
        state.json_error = Some("Invalid JSON".into());
        term.render_widget(CodeDetail::new(&state, UiMode::EditJson), term.area());

        assert!(term.buffer_contains("Parsed content (JSON)"));
        assert!(term.buffer_contains("Invalid JSON"));
    }

    #[test]
    fn test_missing_code_placeholder() {
        let mut term = TestTerminal::new();
        let mut state = CodeDetailState::new(&Settings::default());
        state.data.request(Some("7".into()));
        term.render_widget(CodeDetail::new(&state, UiMode::Normal), term.area());

        assert!(term.buffer_contains("Loading code"));
    }
}
