//! Fixed-window hit counting per client.

use std::collections::HashMap;

use gamenight_core::ClientKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    pub count: u32,
    /// Epoch milliseconds at which the current window opened.
    pub window_start: u64,
}

impl HitRecord {
    fn fresh(now: u64) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }
}

/// A record as it stands after counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatedRecord {
    pub count: u32,
    pub window_start: u64,
    pub window_end: u64,
}

/// Per-client request counter over fixed windows.
///
/// Windows are anchored at a client's first request and do not slide, so a
/// client can land up to twice the limit in a short burst that straddles a
/// window boundary.
#[derive(Debug)]
pub struct HitTracker {
    window_ms: u64,
    hits: HashMap<ClientKey, HitRecord>,
}

impl HitTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            hits: HashMap::new(),
        }
    }

    /// Count one request from `key` at `now`.
    ///
    /// Opens a new window when there is none or the previous one has ended
    /// (`window_start + window <= now`); otherwise increments in place.
    pub fn record(&mut self, key: &ClientKey, now: u64) -> UpdatedRecord {
        let window_ms = self.window_ms;

        let record = match self.hits.get_mut(key) {
            Some(record) if record.window_start.saturating_add(window_ms) > now => {
                record.count = record.count.saturating_add(1);
                *record
            }
            Some(record) => {
                *record = HitRecord::fresh(now);
                *record
            }
            None => {
                let record = HitRecord::fresh(now);
                self.hits.insert(key.clone(), record);
                record
            }
        };

        UpdatedRecord {
            count: record.count,
            window_start: record.window_start,
            window_end: record.window_start.saturating_add(window_ms),
        }
    }

    pub fn get(&self, key: &ClientKey) -> Option<HitRecord> {
        self.hits.get(key).copied()
    }

    /// Drop every record whose window ended strictly before `now`.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let window_ms = self.window_ms;
        let before = self.hits.len();
        self.hits
            .retain(|_, record| record.window_start.saturating_add(window_ms) >= now);
        before - self.hits.len()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: u64 = 60_000;
    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn test_first_hit_opens_window() {
        let mut tracker = HitTracker::new(WINDOW);
        let key = ClientKey::from("10.0.0.1");

        let record = tracker.record(&key, T0);
        assert_eq!(record.count, 1);
        assert_eq!(record.window_start, T0);
        assert_eq!(record.window_end, T0 + WINDOW);
    }

    #[test]
    fn test_hits_within_window_increment() {
        let mut tracker = HitTracker::new(WINDOW);
        let key = ClientKey::from("10.0.0.1");

        tracker.record(&key, T0);
        tracker.record(&key, T0 + 10);
        let record = tracker.record(&key, T0 + WINDOW - 1);

        assert_eq!(record.count, 3);
        assert_eq!(record.window_start, T0);
    }

    #[test]
    fn test_window_boundary_resets() {
        let mut tracker = HitTracker::new(WINDOW);
        let key = ClientKey::from("10.0.0.1");

        tracker.record(&key, T0);
        tracker.record(&key, T0 + 1);

        // window_start + window == now counts as expired
        let record = tracker.record(&key, T0 + WINDOW);
        assert_eq!(record.count, 1);
        assert_eq!(record.window_start, T0 + WINDOW);
        assert_eq!(record.window_end, T0 + 2 * WINDOW);
    }

    #[test]
    fn test_purge_keeps_live_and_boundary_windows() {
        let mut tracker = HitTracker::new(WINDOW);
        tracker.record(&ClientKey::from("old"), T0);
        tracker.record(&ClientKey::from("edge"), T0 + 1);
        tracker.record(&ClientKey::from("new"), T0 + WINDOW);

        let removed = tracker.purge_expired(T0 + WINDOW + 1);

        assert_eq!(removed, 1);
        assert!(tracker.get(&ClientKey::from("old")).is_none());
        assert!(tracker.get(&ClientKey::from("edge")).is_some());
        assert!(tracker.get(&ClientKey::from("new")).is_some());
    }
}
