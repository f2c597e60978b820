//! Read/write view over a [`TextBuffer`]
//!
//! Keeps the cursor row in view and draws the cursor as a reversed cell when
//! focused.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use mlops_app::text_buffer::TextBuffer;

use crate::theme::styles;

pub struct TextArea<'a> {
    buffer: &'a TextBuffer,
    title: &'a str,
    focused: bool,
    placeholder: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    pub fn new(buffer: &'a TextBuffer, title: &'a str) -> Self {
        Self {
            buffer,
            title,
            focused: false,
            placeholder: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = Some(text);
        self
    }
}

/// First line to show so that `cursor_row` stays within `rows`
fn scroll_offset(cursor_row: usize, rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    cursor_row.saturating_sub(rows - 1)
}

impl Widget for TextArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block: Block = styles::glass_block(self.focused).title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.buffer.is_empty() && !self.focused {
            if let Some(placeholder) = self.placeholder {
                Paragraph::new(placeholder)
                    .style(styles::text_muted())
                    .render(inner, buf);
                return;
            }
        }

        let (row, col) = self.buffer.cursor();
        let offset = scroll_offset(row, inner.height as usize);
        let lines: Vec<Line> = self
            .buffer
            .lines()
            .iter()
            .skip(offset)
            .take(inner.height as usize)
            .map(|l| Line::raw(l.as_str()))
            .collect();
        Paragraph::new(lines)
            .style(styles::text_primary())
            .render(inner, buf);

        if self.focused {
            let before: String = self.buffer.lines()[row].chars().take(col).collect();
            let x = inner.x.saturating_add(before.width() as u16);
            let y = inner.y + (row - offset) as u16;
            if x < inner.x + inner.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
                }
            }
        }
    }
}
