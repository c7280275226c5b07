//! Admission control port.

use crate::domain::ClientKey;

/// Header carrying the requests left in the current window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header carrying the epoch second at which the current window ends.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";
/// Header carrying the seconds a rejected client should wait.
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// Admission gate trait - decides whether a request reaches the resolver.
///
/// Implementations must serialize the ban check, the window update and the
/// escalation for a single key. The call never suspends.
pub trait AdmissionControl: Send + Sync {
    fn admit(&self, key: &ClientKey) -> Admission;
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed(Quota),
    Rejected(Rejection),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed(_))
    }
}

/// Window accounting for an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Requests counted in the current window, this one included.
    pub count: u32,
    /// Requests still allowed before escalation.
    pub remaining: u32,
    /// Epoch milliseconds at which the window closes.
    pub window_end_ms: u64,
}

impl Quota {
    /// Window end rounded up to whole epoch seconds.
    pub fn reset_epoch_secs(&self) -> u64 {
        ceil_secs(self.window_end_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The client was already serving a ban.
    Banned,
    /// This request pushed the client over the window threshold.
    Escalated,
}

/// A locally synthesized 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectionReason,
    pub retry_after_secs: u64,
}

impl Rejection {
    pub const STATUS: u16 = 429;

    pub fn message(&self) -> &'static str {
        match self.reason {
            RejectionReason::Banned => "Too many requests. Try again later.",
            RejectionReason::Escalated => "Too many requests. Slow down.",
        }
    }
}

/// A request that can answer for itself when the gate turns it away.
pub trait Rejectable {
    type Response;

    fn reject(self, rejection: &Rejection) -> Self::Response;
}

/// A resolver response that accepts rate limit headers.
pub trait Annotate {
    fn set_numeric_header(&mut self, name: &'static str, value: u64);
}

/// Milliseconds to whole seconds, rounding up.
pub fn ceil_secs(millis: u64) -> u64 {
    millis.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_secs_rounds_up() {
        assert_eq!(ceil_secs(0), 0);
        assert_eq!(ceil_secs(1), 1);
        assert_eq!(ceil_secs(1000), 1);
        assert_eq!(ceil_secs(1001), 2);
        assert_eq!(ceil_secs(300_000), 300);
    }

    #[test]
    fn test_reset_epoch_secs() {
        let quota = Quota {
            count: 1,
            remaining: 99,
            window_end_ms: 1_700_000_060_500,
        };
        assert_eq!(quota.reset_epoch_secs(), 1_700_000_061);
    }

    #[test]
    fn test_rejection_messages_differ() {
        let banned = Rejection {
            reason: RejectionReason::Banned,
            retry_after_secs: 10,
        };
        let escalated = Rejection {
            reason: RejectionReason::Escalated,
            retry_after_secs: 300,
        };
        assert_ne!(banned.message(), escalated.message());
        assert_eq!(Rejection::STATUS, 429);
    }
}
