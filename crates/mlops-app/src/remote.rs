//! Keyed remote-data slots
//!
//! A [`RemoteData`] slot holds the last fetched snapshot of one backend
//! resource together with loading and error state. Every request is issued
//! with a [`RequestTicket`]; a resolution is only applied when its ticket is
//! still the most recently issued one, so a slow response for an old key (or
//! an older request for the same key) can never overwrite newer data.
//!
//! A `None` key disables the slot: nothing is fetched and no data is exposed.

use std::time::{Duration, Instant};

/// Identifies one issued request for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub key: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct RemoteData<T> {
    key: Option<String>,
    generation: u64,
    data: Option<T>,
    error: Option<String>,
    loading: bool,
    refresh_every: Option<Duration>,
    last_issued: Option<Instant>,
}

impl<T> Default for RemoteData<T> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            data: None,
            error: None,
            loading: false,
            refresh_every: None,
            last_issued: None,
        }
    }
}

impl<T> RemoteData<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-issue the current key whenever `interval` has elapsed
    pub fn with_refresh(mut self, interval: Option<Duration>) -> Self {
        self.refresh_every = interval.filter(|d| !d.is_zero());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Issue a request for `key`.
    ///
    /// Returns the ticket the fetch must resolve with, or `None` when the key
    /// is `None` (slot disabled and cleared). Switching to a different key
    /// drops the previous key's data immediately; re-requesting the same key
    /// keeps showing the current data until the new response lands.
    pub fn request(&mut self, key: Option<String>) -> Option<RequestTicket> {
        self.request_at(key, Instant::now())
    }

    pub fn request_at(&mut self, key: Option<String>, now: Instant) -> Option<RequestTicket> {
        // Any outstanding ticket is superseded, even when disabling
        self.generation += 1;

        let Some(key) = key else {
            self.key = None;
            self.data = None;
            self.error = None;
            self.loading = false;
            self.last_issued = None;
            return None;
        };

        if self.key.as_deref() != Some(key.as_str()) {
            self.data = None;
            self.error = None;
        }
        self.key = Some(key.clone());
        self.loading = true;
        self.last_issued = Some(now);

        Some(RequestTicket {
            key,
            generation: self.generation,
        })
    }

    /// Re-issue the current key, if any
    pub fn refresh(&mut self) -> Option<RequestTicket> {
        let key = self.key.clone()?;
        self.request(Some(key))
    }

    /// Whether `ticket` is the latest request issued for this slot
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation && self.key.as_deref() == Some(ticket.key.as_str())
    }

    /// Apply a fetch result. Returns `false` (and changes nothing) when the
    /// ticket has been superseded.
    pub fn resolve(&mut self, ticket: &RequestTicket, result: Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => {
                // Keep stale data visible next to the error
                self.error = Some(error);
            }
        }
        true
    }

    /// Stop tracking the key entirely (view left)
    pub fn reset(&mut self) {
        self.request(None);
    }

    /// Whether the refresh interval has elapsed since the last request
    pub fn refresh_due(&self, now: Instant) -> bool {
        match (self.refresh_every, self.last_issued, &self.key) {
            (Some(every), Some(last), Some(_)) => !self.loading && now.duration_since(last) >= every,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_key_never_issues() {
        let mut slot: RemoteData<u32> = RemoteData::new();
        assert!(slot.request(None).is_none());
        assert!(slot.data().is_none());
        assert!(slot.error().is_none());
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_resolve_applies_current_ticket() {
        let mut slot = RemoteData::new();
        let ticket = slot.request(Some("codes".into())).unwrap();
        assert!(slot.is_loading());
        assert!(slot.resolve(&ticket, Ok(3)));
        assert_eq!(slot.data(), Some(&3));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_last_issued_wins_same_key() {
        let mut slot = RemoteData::new();
        let first = slot.request(Some("codes".into())).unwrap();
        let second = slot.request(Some("codes".into())).unwrap();

        // Newer resolves first, older arrives late
        assert!(slot.resolve(&second, Ok("fresh")));
        assert!(!slot.resolve(&first, Ok("stale")));
        assert_eq!(slot.data(), Some(&"fresh"));
    }

    #[test]
    fn test_last_issued_wins_across_keys() {
        let mut slot = RemoteData::new();
        let old = slot.request(Some("/codes/1".into())).unwrap();
        let new = slot.request(Some("/codes/2".into())).unwrap();
        assert!(!slot.resolve(&old, Ok(1)));
        assert!(slot.data().is_none());
        assert!(slot.resolve(&new, Ok(2)));
        assert_eq!(slot.data(), Some(&2));
    }

    #[test]
    fn test_key_change_clears_previous_data() {
        let mut slot = RemoteData::new();
        let t = slot.request(Some("a".into())).unwrap();
        slot.resolve(&t, Ok(1));
        slot.request(Some("b".into()));
        assert!(slot.data().is_none());
    }

    #[test]
    fn test_same_key_keeps_data_while_refreshing() {
        let mut slot = RemoteData::new();
        let t = slot.request(Some("a".into())).unwrap();
        slot.resolve(&t, Ok(1));
        slot.refresh();
        assert_eq!(slot.data(), Some(&1));
        assert!(slot.is_loading());
    }

    #[test]
    fn test_disabling_supersedes_in_flight() {
        let mut slot = RemoteData::new();
        let t = slot.request(Some("a".into())).unwrap();
        slot.reset();
        assert!(!slot.resolve(&t, Ok(1)));
        assert!(slot.data().is_none());
        assert!(slot.key().is_none());
    }

    #[test]
    fn test_error_keeps_stale_data() {
        let mut slot = RemoteData::new();
        let t = slot.request(Some("a".into())).unwrap();
        slot.resolve(&t, Ok(1));
        let t = slot.refresh().unwrap();
        slot.resolve(&t, Err("boom".to_string()));
        assert_eq!(slot.data(), Some(&1));
        assert_eq!(slot.error(), Some("boom"));
    }

    #[test]
    fn test_refresh_due_after_interval() {
        let start = Instant::now();
        let mut slot: RemoteData<u32> =
            RemoteData::new().with_refresh(Some(Duration::from_secs(10)));
        let t = slot.request_at(Some("a".into()), start).unwrap();
        assert!(!slot.refresh_due(start + Duration::from_secs(20)), "loading");
        slot.resolve(&t, Ok(1));
        assert!(!slot.refresh_due(start + Duration::from_secs(5)));
        assert!(slot.refresh_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_interval_disables_refresh() {
        let start = Instant::now();
        let mut slot: RemoteData<u32> = RemoteData::new().with_refresh(Some(Duration::ZERO));
        let t = slot.request_at(Some("a".into()), start).unwrap();
        slot.resolve(&t, Ok(1));
        assert!(!slot.refresh_due(start + Duration::from_secs(3600)));
    }
}
