//! Periodic cleanup of expired admission state.

use super::ban_list::BanList;
use super::hit_tracker::HitTracker;

/// Entries removed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub hits_removed: usize,
    pub bans_removed: usize,
}

/// Decides when the maps are due for cleanup and performs it.
///
/// Has no thread of its own. Whoever holds the gate lock calls
/// [`Sweeper::maybe_sweep`], so the cost lands on the request that happens to
/// cross the interval.
#[derive(Debug)]
pub struct Sweeper {
    interval_ms: u64,
    last_sweep: u64,
}

impl Sweeper {
    pub fn new(interval_ms: u64, now: u64) -> Self {
        Self {
            interval_ms,
            last_sweep: now,
        }
    }

    pub fn is_due(&self, now: u64) -> bool {
        now.saturating_sub(self.last_sweep) >= self.interval_ms
    }

    pub fn maybe_sweep(
        &mut self,
        now: u64,
        hits: &mut HitTracker,
        bans: &mut BanList,
    ) -> Option<SweepReport> {
        self.is_due(now).then(|| self.sweep(now, hits, bans))
    }

    /// Sweep unconditionally and restart the interval.
    pub fn sweep(&mut self, now: u64, hits: &mut HitTracker, bans: &mut BanList) -> SweepReport {
        let report = SweepReport {
            hits_removed: hits.purge_expired(now),
            bans_removed: bans.purge_expired(now),
        };
        self.last_sweep = now;
        report
    }

    pub fn last_sweep(&self) -> u64 {
        self.last_sweep
    }
}
