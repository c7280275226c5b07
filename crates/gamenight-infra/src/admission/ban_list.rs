//! Temporary client bans.

use std::collections::HashMap;

use gamenight_core::ClientKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanRecord {
    /// Epoch milliseconds at which the ban lifts.
    pub banned_until: u64,
}

/// Ban expirations keyed by client.
///
/// A record with `banned_until <= now` is logically expired even while it
/// still sits in the map waiting for the sweeper.
#[derive(Debug)]
pub struct BanList {
    ban_ms: u64,
    bans: HashMap<ClientKey, BanRecord>,
}

impl BanList {
    pub fn new(ban_ms: u64) -> Self {
        Self {
            ban_ms,
            bans: HashMap::new(),
        }
    }

    pub fn is_banned(&self, key: &ClientKey, now: u64) -> bool {
        self.banned_until(key, now).is_some()
    }

    /// Expiry of the active ban on `key`, if any.
    pub fn banned_until(&self, key: &ClientKey, now: u64) -> Option<u64> {
        self.bans
            .get(key)
            .map(|record| record.banned_until)
            .filter(|until| *until > now)
    }

    /// Ban `key` from `now`, replacing any earlier ban. Returns the expiry.
    pub fn ban(&mut self, key: &ClientKey, now: u64) -> u64 {
        let banned_until = now.saturating_add(self.ban_ms);
        self.bans.insert(key.clone(), BanRecord { banned_until });
        banned_until
    }

    /// Drop every ban that lifted strictly before `now`.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let before = self.bans.len();
        self.bans.retain(|_, record| record.banned_until >= now);
        before - self.bans.len()
    }

    pub fn len(&self) -> usize {
        self.bans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bans.is_empty()
    }
}
