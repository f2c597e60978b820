//! Test utilities for TUI rendering verification
//!
//! Widgets are rendered into ratatui's `TestBackend` and asserted on by
//! searching the resulting buffer.
//!
//! ```ignore
//! let mut term = TestTerminal::new();
//! term.render_widget(MainHeader::new(&Route::CodeList), term.area());
//! assert!(term.buffer_contains("mlops-console"));
//! ```

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};
use serde_json::json;

use mlops_app::remote::RemoteData;
use mlops_core::Code;

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 80;
pub const TEST_HEIGHT: u16 = 24;

pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// 80x24
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Full-frame rendering, e.g. `view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        buffer_to_string(self.buffer()).contains(text)
    }

    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        line_content(self.buffer(), line).contains(text)
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&str> {
        let buffer = self.buffer();
        if x < buffer.area.width && y < buffer.area.height {
            Some(buffer[(x, y)].symbol())
        } else {
            None
        }
    }

    /// All content as a string (for debugging failed assertions)
    pub fn content(&self) -> String {
        buffer_to_string(self.buffer())
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buffer.area.height {
        result.push_str(&line_content(buffer, y));
        result.push('\n');
    }
    result
}

fn line_content(buffer: &Buffer, line: u16) -> String {
    let mut result = String::new();
    if line < buffer.area.height {
        for x in 0..buffer.area.width {
            result.push_str(buffer[(x, line)].symbol());
        }
    }
    result
}

/// A slot holding `value` as if a fetch had just succeeded
pub fn loaded<T>(value: T) -> RemoteData<T> {
    let mut data = RemoteData::new();
    let ticket = data
        .request(Some("test".to_string()))
        .expect("keyed request yields a ticket");
    data.resolve(&ticket, Ok(value));
    data
}

/// Two versions; the second has one parsing result with one version
pub fn sample_code(id: i64) -> Code {
    serde_json::from_value(json!({
        "id": id,
        "name": "train.py",
        "created_at": "2024-01-01T10:00:00",
        "updated_at": "2024-01-02T10:00:00",
        "versions": [
            {
                "id": 10, "version": 1, "content": "print(1)",
                "created_at": "2024-01-01T10:00:00", "parsing_results": []
            },
            {
                "id": 20, "version": 2, "content": "print(2)\nprint(3)",
                "created_at": "2024-01-02T10:00:00",
                "parsing_results": [{
                    "id": 30, "code_version_id": 20, "name": "Parsing Result v1",
                    "created_at": "2024-01-02T11:00:00",
                    "versions": [{
                        "id": 31, "version": 1,
                        "content": {"name": "train", "framework": "torch"},
                        "created_at": "2024-01-02T11:00:00"
                    }]
                }]
            }
        ]
    }))
    .expect("sample code deserializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_custom_size() {
        let term = TestTerminal::with_size(100, 50);
        assert_eq!(term.area(), Rect::new(0, 0, 100, 50));
    }

    #[test]
    fn test_buffer_contains() {
        let mut term = TestTerminal::with_size(20, 5);
        term.render_widget(Paragraph::new("Hello World"), term.area());

        assert!(term.buffer_contains("Hello World"));
        assert!(!term.buffer_contains("Goodbye"));
        assert!(term.line_contains(0, "Hello"));
        assert_eq!(term.cell_at(0, 0), Some("H"));
        assert_eq!(term.cell_at(30, 0), None);
    }

    #[test]
    fn test_loaded_slot() {
        let data = loaded(3);
        assert_eq!(data.data(), Some(&3));
        assert!(!data.is_loading());
    }
}
