//! Time source port.

/// Wall-clock abstraction so admission decisions can be replayed with
/// deterministic timestamps.
pub trait Clock: Send + Sync {
    /// Current time as Unix epoch milliseconds.
    fn now_millis(&self) -> u64;
}
