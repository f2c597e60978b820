//! Editable text with a cursor
//!
//! Backs every input in the console: single-line fields (code name, cluster
//! name, search) and multi-line editors (script content, parsing-result JSON,
//! kind config). Edits are purely local; nothing here talks to a backend.

use crate::input_key::InputKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    /// Cursor row (index into `lines`)
    row: usize,
    /// Cursor column, in chars
    col: usize,
    multiline: bool,
    /// Text as last loaded, for dirty tracking
    baseline: String,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::single_line("")
    }
}

impl TextBuffer {
    pub fn single_line(text: &str) -> Self {
        let mut buf = Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            multiline: false,
            baseline: String::new(),
        };
        buf.set_text(text);
        buf
    }

    pub fn multi_line(text: &str) -> Self {
        let mut buf = Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            multiline: true,
            baseline: String::new(),
        };
        buf.set_text(text);
        buf
    }

    /// Replace the content and reset the dirty baseline.
    ///
    /// The cursor moves to the start.
    pub fn set_text(&mut self, text: &str) {
        let text = if self.multiline {
            text.to_string()
        } else {
            text.replace(['\n', '\r'], " ")
        };
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = 0;
        self.col = 0;
        self.baseline = text;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Cursor after the last character
    pub fn move_to_end(&mut self) {
        self.row = self.lines.len() - 1;
        self.col = self.line_len(self.row);
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Changed since the last [`TextBuffer::set_text`]
    pub fn is_dirty(&self) -> bool {
        self.text() != self.baseline
    }

    /// Cursor as (row, char column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_index(&self, row: usize, col: usize) -> usize {
        self.lines[row]
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.lines[row].len())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let at = self.byte_index(self.row, self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    pub fn insert_newline(&mut self) {
        if !self.multiline {
            return;
        }
        let at = self.byte_index(self.row, self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let at = self.byte_index(self.row, self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_index(self.row, self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    /// Apply an editing key. Returns `false` for keys that are not edits,
    /// so the caller can route them elsewhere.
    pub fn handle_key(&mut self, key: InputKey) -> bool {
        match key {
            InputKey::Char(c) => self.insert_char(c),
            InputKey::Enter if self.multiline => self.insert_newline(),
            InputKey::Tab if self.multiline => self.insert_str("    "),
            InputKey::Backspace => self.backspace(),
            InputKey::Delete => self.delete(),
            InputKey::Left => self.move_left(),
            InputKey::Right => self.move_right(),
            InputKey::Up if self.multiline => self.move_up(),
            InputKey::Down if self.multiline => self.move_down(),
            InputKey::Home => self.col = 0,
            InputKey::End => self.col = self.line_len(self.row),
            _ => return false,
        }
        true
    }
}
