//! Request admission: window accounting, bans and cleanup.

mod ban_list;
mod clock;
mod config;
mod gate;
mod hit_tracker;
mod sweeper;

pub use ban_list::{BanList, BanRecord};
pub use clock::{ManualClock, SystemClock};
pub use config::{AdmissionConfig, SweepMode};
pub use gate::{AdmissionGate, GateFuture};
pub use hit_tracker::{HitRecord, HitTracker, UpdatedRecord};
pub use sweeper::{SweepReport, Sweeper};
