//! Pod log stream consumer state
//!
//! One live connection per log view. Every (re)connection gets a new
//! generation; lines and end-of-stream reports carry the generation they were
//! produced under, and anything from an older generation is dropped.

use std::path::{Path, PathBuf};

use mlops_client::LogStreamRequest;
use mlops_core::prelude::*;

/// User-visible message for a broken stream
pub const STREAM_FAILED_MESSAGE: &str =
    "Failed to stream logs. Check if the pod exists and is running.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Idle,
    Connecting,
    Streaming,
    /// Backend closed the stream normally
    Ended,
    Failed(String),
}

impl StreamStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, StreamStatus::Connecting | StreamStatus::Streaming)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogStreamState {
    request: Option<LogStreamRequest>,
    generation: u64,
    lines: Vec<String>,
    status: StreamStatus,
    /// First visible line
    pub scroll: usize,
    /// Keep the view pinned to the newest line
    pub auto_scroll: bool,
    /// Viewport height, updated by the renderer
    pub visible_rows: usize,
}

impl LogStreamState {
    pub fn new() -> Self {
        Self {
            auto_scroll: true,
            ..Default::default()
        }
    }

    pub fn request(&self) -> Option<&LogStreamRequest> {
        self.request.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn status(&self) -> &StreamStatus {
        &self.status
    }

    /// Open a stream for `request`. Returns the new generation, or `None`
    /// when the same key is already live.
    pub fn open(&mut self, request: LogStreamRequest) -> Option<u64> {
        if self.request.as_ref() == Some(&request) && self.status.is_live() {
            return None;
        }
        Some(self.reconnect(request))
    }

    /// Drop the buffer and reconnect with the current key
    pub fn restart(&mut self) -> Option<(LogStreamRequest, u64)> {
        let request = self.request.clone()?;
        let generation = self.reconnect(request.clone());
        Some((request, generation))
    }

    /// Flip follow mode; the stream is reopened under the new key.
    pub fn toggle_follow(&mut self) -> Option<(LogStreamRequest, u64)> {
        let request = self.request.clone()?;
        let follow = !request.follow;
        let request = request.with_follow(follow);
        let generation = self.reconnect(request.clone());
        Some((request, generation))
    }

    fn reconnect(&mut self, request: LogStreamRequest) -> u64 {
        self.generation += 1;
        self.request = Some(request);
        self.lines.clear();
        self.status = StreamStatus::Connecting;
        self.scroll = 0;
        self.auto_scroll = true;
        self.generation
    }

    /// Leave the view; late messages from the old connection are ignored.
    pub fn close(&mut self) {
        self.generation += 1;
        self.request = None;
        self.status = StreamStatus::Idle;
    }

    pub fn push_line(&mut self, generation: u64, line: String) -> bool {
        if generation != self.generation || !self.status.is_live() {
            return false;
        }
        self.status = StreamStatus::Streaming;
        self.lines.push(line);
        true
    }

    pub fn finish(&mut self, generation: u64, result: std::result::Result<(), String>) -> bool {
        if generation != self.generation || !self.status.is_live() {
            return false;
        }
        self.status = match result {
            Ok(()) => StreamStatus::Ended,
            Err(e) => {
                warn!("Log stream failed: {}", e);
                StreamStatus::Failed(STREAM_FAILED_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, n: usize, visible: usize) {
        let max = self.lines.len().saturating_sub(visible);
        self.scroll = (self.scroll + n).min(max);
        self.auto_scroll = self.scroll >= max;
    }

    /// First visible line for a viewport of `visible` rows
    pub fn offset(&self, visible: usize) -> usize {
        if self.auto_scroll {
            self.lines.len().saturating_sub(visible)
        } else {
            self.scroll
        }
    }

    /// Buffer contents as written by a download
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

/// `{pod}-logs.txt`
pub fn download_file_name(pod: &str) -> String {
    format!("{pod}-logs.txt")
}

/// Write `lines` to `<dir>/{pod}-logs.txt` and return the path.
pub fn write_download(dir: &Path, pod: &str, lines: &[String]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Creating download directory {}", dir.display()))?;
    let path = dir.join(download_file_name(pod));
    std::fs::write(&path, lines.join("\n"))
        .with_context(|| format!("Writing {}", path.display()))?;
    info!("Saved {} log lines to {:?}", lines.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request() -> LogStreamRequest {
        LogStreamRequest::new("dev", "web-1").with_namespace("prod")
    }

    #[test]
    fn test_lines_append_in_order() {
        let mut state = LogStreamState::new();
        let gen = state.open(request()).unwrap();
        assert_eq!(state.status(), &StreamStatus::Connecting);
        for line in ["a", "b", "c"] {
            assert!(state.push_line(gen, line.into()));
        }
        assert_eq!(state.lines(), &["a", "b", "c"]);
        assert_eq!(state.status(), &StreamStatus::Streaming);
    }

    #[test]
    fn test_same_key_does_not_reconnect() {
        let mut state = LogStreamState::new();
        state.open(request()).unwrap();
        assert!(state.open(request()).is_none());
    }

    #[test]
    fn test_key_change_ignores_old_connection() {
        let mut state = LogStreamState::new();
        let old = state.open(request()).unwrap();
        state.push_line(old, "old".into());

        let new = state
            .open(LogStreamRequest::new("dev", "web-2"))
            .unwrap();
        assert!(state.lines().is_empty());
        assert!(!state.push_line(old, "late".into()));
        assert!(!state.finish(old, Err("boom".into())));
        assert!(state.push_line(new, "fresh".into()));
        assert_eq!(state.lines(), &["fresh"]);
    }

    #[test]
    fn test_failure_stops_and_is_not_retried() {
        let mut state = LogStreamState::new();
        let gen = state.open(request()).unwrap();
        state.push_line(gen, "one".into());
        assert!(state.finish(gen, Err("connection reset".into())));
        assert_eq!(
            state.status(),
            &StreamStatus::Failed(STREAM_FAILED_MESSAGE.into())
        );
        // Buffer survives the failure
        assert_eq!(state.lines(), &["one"]);
        assert!(!state.push_line(gen, "two".into()));
    }

    #[test]
    fn test_restart_clears_buffer() {
        let mut state = LogStreamState::new();
        let gen = state.open(request()).unwrap();
        state.push_line(gen, "one".into());
        state.finish(gen, Ok(()));

        let (req, new_gen) = state.restart().unwrap();
        assert_eq!(req, request());
        assert!(new_gen > gen);
        assert!(state.lines().is_empty());
        assert_eq!(state.status(), &StreamStatus::Connecting);
    }

    #[test]
    fn test_toggle_follow_reopens() {
        let mut state = LogStreamState::new();
        state.open(request()).unwrap();
        let (req, _) = state.toggle_follow().unwrap();
        assert!(!req.follow);
        assert_eq!(state.request().map(|r| r.follow), Some(false));
    }

    #[test]
    fn test_close_drops_late_lines() {
        let mut state = LogStreamState::new();
        let gen = state.open(request()).unwrap();
        state.close();
        assert!(!state.push_line(gen, "late".into()));
        assert_eq!(state.status(), &StreamStatus::Idle);
    }

    #[test]
    fn test_offset_follows_tail_until_scrolled() {
        let mut state = LogStreamState::new();
        let gen = state.open(request()).unwrap();
        for i in 0..10 {
            state.push_line(gen, i.to_string());
        }
        assert_eq!(state.offset(4), 6);
        state.scroll = 6;
        state.scroll_up(2);
        assert_eq!(state.offset(4), 4);
        state.scroll_down(10, 4);
        assert!(state.auto_scroll);
    }

    #[test]
    fn test_download_writes_joined_lines() {
        let dir = tempdir().unwrap();
        let lines = vec!["first".to_string(), "second".to_string()];
        let path = write_download(dir.path(), "web-1", &lines).unwrap();
        assert_eq!(path.file_name().unwrap(), "web-1-logs.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "first\nsecond");
    }

    #[test]
    fn test_download_into_a_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_download(&blocker, "web-1", &["a".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
