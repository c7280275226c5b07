//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod admission;
mod clock;

pub use admission::{
    Admission, AdmissionControl, Annotate, Quota, RATE_LIMIT_REMAINING_HEADER,
    RATE_LIMIT_RESET_HEADER, RETRY_AFTER_HEADER, Rejectable, Rejection, RejectionReason,
    ceil_secs,
};
pub use clock::Clock;
