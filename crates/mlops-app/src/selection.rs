//! Row selection and bulk deletion results

use std::collections::BTreeSet;

/// Set of selected row ids (checkbox state).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected
    pub fn toggle(&mut self, id: i64) -> bool {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    /// Drop ids that no longer exist in `present`
    pub fn retain_present(&mut self, present: &[i64]) {
        self.ids.retain(|id| present.contains(id));
    }
}

/// Aggregate result of deleting several rows concurrently.
///
/// The batch only counts as succeeded when every request succeeded; the
/// partial outcome is kept so the user learns which rows survived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<i64>,
    /// Failed ids with the backend's message
    pub failed: Vec<(i64, String)>,
}

impl BulkDeleteOutcome {
    pub fn from_results(results: Vec<(i64, Result<(), String>)>) -> Self {
        let mut outcome = Self::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.deleted.push(id),
                Err(e) => outcome.failed.push((id, e)),
            }
        }
        outcome
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// User-facing summary
    pub fn summary(&self, noun_plural: &str) -> String {
        if self.is_success() {
            return format!("Deleted {} {}.", self.deleted.len(), noun_plural);
        }
        let ids: Vec<String> = self.failed.iter().map(|(id, _)| id.to_string()).collect();
        let first_error = self
            .failed
            .first()
            .map(|(_, e)| e.as_str())
            .unwrap_or_default();
        format!(
            "Failed to delete selected {noun_plural}: deleted {} of {}; failed: {} ({first_error})",
            self.deleted.len(),
            self.total(),
            ids.join(", ")
        )
    }
}
