//! # Gamenight Infrastructure
//!
//! Concrete implementations of the ports defined in `gamenight-core`.
//!
//! The only stateful component is the in-memory [`AdmissionGate`]: a per-client
//! fixed-window limiter that escalates repeat offenders into temporary bans.
//! Limits are per-process, not distributed across instances.

pub mod admission;

pub use admission::{AdmissionConfig, AdmissionGate, ManualClock, SweepMode, SystemClock};
