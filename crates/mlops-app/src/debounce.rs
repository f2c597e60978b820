//! Debounced editor height
//!
//! The script editor's height follows its line count, but is only recomputed
//! once typing has paused for the quiet period. Each edit pushes the deadline
//! back; the recomputation reads the content as it is when the deadline passes.

use std::time::{Duration, Instant};

/// Minimum editor height in pixels
pub const MIN_EDITOR_HEIGHT_PX: u32 = 300;
/// Height of one editor line in pixels
pub const LINE_HEIGHT_PX: u32 = 19;
/// Editor chrome (padding, borders) in pixels
pub const EDITOR_PADDING_PX: u32 = 20;

/// `max(300, lines * 19 + 20)`
pub fn editor_height_px(content: &str) -> u32 {
    let lines = content.split('\n').count() as u32;
    MIN_EDITOR_HEIGHT_PX.max(lines.saturating_mul(LINE_HEIGHT_PX) + EDITOR_PADDING_PX)
}

/// Number of text rows that fit in `height_px`
pub fn rows_for_height(height_px: u32) -> u16 {
    (height_px.saturating_sub(EDITOR_PADDING_PX) / LINE_HEIGHT_PX).min(u16::MAX as u32) as u16
}

#[derive(Debug, Clone)]
pub struct DebouncedHeight {
    quiet: Duration,
    deadline: Option<Instant>,
    height_px: u32,
    recomputations: u64,
}

impl DebouncedHeight {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
            height_px: MIN_EDITOR_HEIGHT_PX,
            recomputations: 0,
        }
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn rows(&self) -> u16 {
        rows_for_height(self.height_px)
    }

    /// How many times the height has been recomputed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Set the height right away (content loaded, not typed)
    pub fn reset_to(&mut self, content: &str) {
        self.deadline = None;
        self.height_px = editor_height_px(content);
    }

    /// Record an edit; the recomputation is pushed back by the quiet period.
    pub fn note_edit(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Recompute if the quiet period has passed. Returns `true` when the
    /// height was recomputed.
    pub fn poll(&mut self, now: Instant, content: &str) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.height_px = editor_height_px(content);
                self.recomputations += 1;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending recomputation (view left or content replaced)
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(100);

    #[test]
    fn test_height_formula() {
        assert_eq!(editor_height_px(""), 300);
        assert_eq!(editor_height_px("a\nb"), 300);
        // 15 lines: 15 * 19 + 20 = 305
        assert_eq!(editor_height_px(&"x\n".repeat(14)), 305);
        assert_eq!(editor_height_px(&"x\n".repeat(99)), 100 * 19 + 20);
    }

    #[test]
    fn test_rows_for_height() {
        assert_eq!(rows_for_height(300), 14);
        assert_eq!(rows_for_height(100 * 19 + 20), 100);
    }

    #[test]
    fn test_rapid_typing_recomputes_once_with_final_content() {
        let start = Instant::now();
        let mut height = DebouncedHeight::new(QUIET);
        let mut content = String::new();

        for (i, c) in ['a', '\n', 'b'].into_iter().enumerate() {
            let now = start + Duration::from_millis(i as u64 * 40);
            content.push(c);
            height.note_edit(now);
            assert!(!height.poll(now, &content));
        }

        // Still inside the quiet period of the last keystroke
        assert!(!height.poll(start + Duration::from_millis(150), &content));

        let final_content = format!("{content}{}", "\n".repeat(20));
        assert!(height.poll(start + Duration::from_millis(180), &final_content));
        assert_eq!(height.recomputations(), 1);
        assert_eq!(height.height_px(), editor_height_px(&final_content));

        // Nothing pending afterwards
        assert!(!height.poll(start + Duration::from_secs(5), &final_content));
        assert_eq!(height.recomputations(), 1);
    }

    #[test]
    fn test_cancel_discards_pending_recomputation() {
        let start = Instant::now();
        let mut height = DebouncedHeight::new(QUIET);
        height.note_edit(start);
        height.cancel();
        assert!(!height.poll(start + Duration::from_secs(1), &"\n".repeat(50)));
        assert_eq!(height.height_px(), MIN_EDITOR_HEIGHT_PX);
        assert_eq!(height.recomputations(), 0);
    }

    #[test]
    fn test_reset_to_applies_immediately() {
        let mut height = DebouncedHeight::new(QUIET);
        height.note_edit(Instant::now());
        height.reset_to(&"\n".repeat(30));
        assert!(!height.is_pending());
        assert_eq!(height.height_px(), 31 * 19 + 20);
    }
}
