//! The per-request admission gate.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use parking_lot::Mutex;

use gamenight_core::ClientKey;
use gamenight_core::ports::{
    Admission, AdmissionControl, Annotate, Clock, Quota, RATE_LIMIT_REMAINING_HEADER,
    RATE_LIMIT_RESET_HEADER, Rejectable, Rejection, RejectionReason, ceil_secs,
};

use super::ban_list::BanList;
use super::clock::SystemClock;
use super::config::{AdmissionConfig, SweepMode, millis};
use super::hit_tracker::HitTracker;
use super::sweeper::{SweepReport, Sweeper};

/// Future returned by [`AdmissionGate::handle`].
pub type GateFuture<T> = LocalBoxFuture<'static, T>;

/// Everything the gate mutates, behind a single lock.
#[derive(Debug)]
struct GateState {
    hits: HitTracker,
    bans: BanList,
    sweeper: Sweeper,
}

/// In-memory admission gate: fixed-window counting with ban escalation.
///
/// One instance is built at startup and shared through `Arc`. Each call to
/// [`AdmissionControl::admit`] runs, under one lock:
///
/// 1. the inline sweep, when [`SweepMode::Inline`] and the interval elapsed;
/// 2. the ban check, which rejects without touching the hit counter;
/// 3. the window update;
/// 4. escalation into a ban once the count exceeds `max_requests`.
///
/// The lock is released before the downstream resolver runs.
pub struct AdmissionGate {
    state: Mutex<GateState>,
    clock: Arc<dyn Clock>,
    max_requests: u32,
    ban_ms: u64,
    inline_sweep: bool,
}

impl AdmissionGate {
    pub fn new(config: &AdmissionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AdmissionConfig, clock: Arc<dyn Clock>) -> Self {
        let ban_ms = millis(config.ban_duration);
        let state = GateState {
            hits: HitTracker::new(millis(config.window)),
            bans: BanList::new(ban_ms),
            sweeper: Sweeper::new(millis(config.clean_interval), clock.now_millis()),
        };

        Self {
            state: Mutex::new(state),
            clock,
            max_requests: config.max_requests,
            ban_ms,
            inline_sweep: config.sweep == SweepMode::Inline,
        }
    }

    /// Admission decision for `key` at an explicit time.
    pub fn admit_at(&self, key: &ClientKey, now: u64) -> Admission {
        let mut state = self.state.lock();
        let GateState {
            hits,
            bans,
            sweeper,
        } = &mut *state;

        if self.inline_sweep {
            if let Some(report) = sweeper.maybe_sweep(now, hits, bans) {
                log_sweep(&report, hits.len(), bans.len());
            }
        }

        if let Some(until) = bans.banned_until(key, now) {
            let retry_after_secs = ceil_secs(until - now);
            tracing::debug!(client = %key, retry_after_secs, "Rejected banned client");
            return Admission::Rejected(Rejection {
                reason: RejectionReason::Banned,
                retry_after_secs,
            });
        }

        let record = hits.record(key, now);

        if record.count > self.max_requests {
            let banned_until = bans.ban(key, now);
            tracing::warn!(
                client = %key,
                count = record.count,
                banned_until,
                "Rate limit exceeded, client banned"
            );
            return Admission::Rejected(Rejection {
                reason: RejectionReason::Escalated,
                retry_after_secs: ceil_secs(self.ban_ms),
            });
        }

        Admission::Allowed(Quota {
            count: record.count,
            remaining: self.max_requests.saturating_sub(record.count),
            window_end_ms: record.window_end,
        })
    }

    /// Run `request` through the gate.
    ///
    /// Rejected requests are answered locally and `resolve` is never called.
    /// Admitted requests are handed to `resolve`; a successful response gets
    /// the rate limit headers, an error passes through untouched.
    pub fn handle<Req, Res, E, F, Fut>(
        &self,
        request: Req,
        key: &ClientKey,
        resolve: F,
    ) -> GateFuture<Result<Res, E>>
    where
        Req: Rejectable<Response = Res>,
        Res: Annotate + 'static,
        E: 'static,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Res, E>> + 'static,
    {
        match self.admit(key) {
            Admission::Rejected(rejection) => {
                future::ready(Ok(request.reject(&rejection))).boxed_local()
            }
            Admission::Allowed(quota) => {
                let response = resolve(request);
                async move {
                    let mut response = response.await?;
                    annotate(&mut response, &quota);
                    Ok(response)
                }
                .boxed_local()
            }
        }
    }

    /// Sweep now regardless of the interval.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(self.clock.now_millis())
    }

    pub fn sweep_at(&self, now: u64) -> SweepReport {
        let mut state = self.state.lock();
        let GateState {
            hits,
            bans,
            sweeper,
        } = &mut *state;

        let report = sweeper.sweep(now, hits, bans);
        log_sweep(&report, hits.len(), bans.len());
        report
    }

    /// Number of clients with a hit record, expired or not.
    pub fn tracked_clients(&self) -> usize {
        self.state.lock().hits.len()
    }

    /// Number of ban records, lifted or not.
    pub fn ban_records(&self) -> usize {
        self.state.lock().bans.len()
    }
}

impl AdmissionControl for AdmissionGate {
    fn admit(&self, key: &ClientKey) -> Admission {
        self.admit_at(key, self.clock.now_millis())
    }
}

fn annotate<R: Annotate>(response: &mut R, quota: &Quota) {
    response.set_numeric_header(RATE_LIMIT_REMAINING_HEADER, u64::from(quota.remaining));
    response.set_numeric_header(RATE_LIMIT_RESET_HEADER, quota.reset_epoch_secs());
}

fn log_sweep(report: &SweepReport, hits_left: usize, bans_left: usize) {
    tracing::debug!(
        hits_removed = report.hits_removed,
        bans_removed = report.bans_removed,
        hits_left,
        bans_left,
        "Admission state swept"
    );
}
