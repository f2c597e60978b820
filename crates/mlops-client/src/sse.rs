//! Incremental decoder for text event streams
//!
//! Chunks arrive with arbitrary boundaries (mid-line, mid-UTF-8 sequence), so
//! the decoder buffers raw bytes and only interprets complete lines.
//!
//! Two framings are understood:
//! - `text/event-stream`: `data:` fields accumulate until a blank line
//!   dispatches them as one event (multiple data lines joined with `\n`).
//!   Comment lines (`:`) and the `event`/`id`/`retry` fields are ignored.
//! - anything else: every line is an event on its own.

/// Framing of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    EventStream,
    Lines,
}

impl Framing {
    /// Pick the framing from a `Content-Type` header value.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.to_ascii_lowercase().contains("text/event-stream") => {
                Framing::EventStream
            }
            _ => Framing::Lines,
        }
    }
}

#[derive(Debug)]
pub struct EventDecoder {
    framing: Framing,
    pending: Vec<u8>,
    data: Vec<String>,
}

impl EventDecoder {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            pending: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Feed a chunk, returning every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = decode_line(&raw[..raw.len() - 1]);
            if let Some(event) = self.handle_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush at end of stream: an unterminated last line still counts, and
    /// buffered `data:` lines are dispatched as if a blank line followed.
    pub fn finish(mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = decode_line(&raw);
            if let Some(event) = self.handle_line(line) {
                events.push(event);
            }
        }
        if let Some(event) = self.dispatch() {
            events.push(event);
        }
        events
    }

    fn handle_line(&mut self, line: String) -> Option<String> {
        match self.framing {
            Framing::Lines => Some(line),
            Framing::EventStream => {
                if line.is_empty() {
                    return self.dispatch();
                }
                if line.starts_with(':') {
                    return None;
                }
                let (field, value) = match line.split_once(':') {
                    Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                    None => (line.as_str(), ""),
                };
                if field == "data" {
                    self.data.push(value.to_string());
                }
                None
            }
        }
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let event = self.data.join("\n");
        self.data.clear();
        Some(event)
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
