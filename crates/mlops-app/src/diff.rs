//! Version comparison for the diff modal

use similar::{ChangeTag, TextDiff};

use mlops_core::Code;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
}

impl DiffTag {
    pub fn sign(&self) -> char {
        match self {
            DiffTag::Equal => ' ',
            DiffTag::Insert => '+',
            DiffTag::Delete => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: DiffTag,
    /// Line text without its trailing newline
    pub text: String,
}

/// Line diff from `old` to `new`
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    TextDiff::from_lines(old, new)
        .iter_all_changes()
        .map(|change| DiffLine {
            tag: match change.tag() {
                ChangeTag::Equal => DiffTag::Equal,
                ChangeTag::Insert => DiffTag::Insert,
                ChangeTag::Delete => DiffTag::Delete,
            },
            text: change.value().trim_end_matches(['\n', '\r']).to_string(),
        })
        .collect()
}

/// Which two versions (by index into `Code::versions`) the modal compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDiffState {
    pub old_index: usize,
    pub new_index: usize,
    pub scroll: usize,
}

impl VersionDiffState {
    /// Default to second-to-last vs last; a single version compares with
    /// itself. `None` when there is nothing to compare.
    pub fn for_code(code: &Code) -> Option<Self> {
        let len = code.versions.len();
        if len == 0 {
            return None;
        }
        Some(Self {
            old_index: len.saturating_sub(2),
            new_index: len - 1,
            scroll: 0,
        })
    }

    pub fn cycle_old(&mut self, len: usize, forward: bool) {
        self.old_index = cycle(self.old_index, len, forward);
        self.scroll = 0;
    }

    pub fn cycle_new(&mut self, len: usize, forward: bool) {
        self.new_index = cycle(self.new_index, len, forward);
        self.scroll = 0;
    }

    pub fn lines(&self, code: &Code) -> Vec<DiffLine> {
        match (
            code.versions.get(self.old_index),
            code.versions.get(self.new_index),
        ) {
            (Some(old), Some(new)) => diff_lines(&old.content, &new.content),
            _ => Vec::new(),
        }
    }
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}
