//! Admission gate configuration.

use std::str::FromStr;
use std::time::Duration;

use gamenight_core::ConfigError;

/// How expired entries get cleaned up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    /// The request that notices an overdue sweep pays for it.
    #[default]
    Inline,
    /// A periodic job calls [`AdmissionGate::sweep`](super::AdmissionGate::sweep).
    Scheduled,
}

impl FromStr for SweepMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(SweepMode::Inline),
            "scheduled" => Ok(SweepMode::Scheduled),
            _ => Err(ConfigError::Invalid {
                var: "RATE_LIMIT_SWEEP",
                value: s.to_string(),
            }),
        }
    }
}

/// Admission gate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Length of one counting window.
    pub window: Duration,
    /// Requests allowed per window before escalation.
    pub max_requests: u32,
    /// How long an escalated client stays banned.
    pub ban_duration: Duration,
    /// Minimum time between two sweeps.
    pub clean_interval: Duration,
    pub sweep: SweepMode,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        let window = Duration::from_secs(60);
        Self {
            window,
            max_requests: 100,
            ban_duration: window * Self::BAN_WINDOWS,
            clean_interval: Duration::from_secs(600),
            sweep: SweepMode::Inline,
        }
    }
}

impl AdmissionConfig {
    /// Default ban length, in windows.
    pub const BAN_WINDOWS: u32 = 5;

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables take their defaults. The ban duration defaults to
    /// [`Self::BAN_WINDOWS`] times the configured window.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let window = parse_var::<u64, _>(&lookup, "RATE_LIMIT_WINDOW_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.window);
        let max_requests =
            parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS")?.unwrap_or(defaults.max_requests);
        let ban_duration = parse_var::<u64, _>(&lookup, "RATE_LIMIT_BAN_DURATION_MS")?
            .map(Duration::from_millis)
            .unwrap_or(window * Self::BAN_WINDOWS);
        let clean_interval = parse_var::<u64, _>(&lookup, "RATE_LIMIT_CLEAN_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.clean_interval);
        let sweep = match lookup("RATE_LIMIT_SWEEP") {
            Some(value) => value.parse()?,
            None => defaults.sweep,
        };

        let config = Self {
            window,
            max_requests,
            ban_duration,
            clean_interval,
            sweep,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.as_millis() == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_WINDOW_MS"));
        }
        if self.max_requests == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_MAX_REQUESTS"));
        }
        if self.ban_duration.as_millis() == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_BAN_DURATION_MS"));
        }
        if self.clean_interval.as_millis() == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_CLEAN_INTERVAL_MS"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                var,
                value: value.clone(),
            })
        })
        .transpose()
}

/// Duration as whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdmissionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AdmissionConfig::default());
        assert_eq!(config.window, Duration::from_millis(60_000));
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.ban_duration, Duration::from_millis(300_000));
        assert_eq!(config.clean_interval, Duration::from_millis(600_000));
        assert_eq!(config.sweep, SweepMode::Inline);
    }

    #[test]
    fn test_ban_duration_follows_window() {
        let config =
            AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_WINDOW_MS", "1000")])).unwrap();
        assert_eq!(config.ban_duration, Duration::from_millis(5_000));

        let config = AdmissionConfig::from_lookup(lookup(&[
            ("RATE_LIMIT_WINDOW_MS", "1000"),
            ("RATE_LIMIT_BAN_DURATION_MS", "1500"),
        ]))
        .unwrap();
        assert_eq!(config.ban_duration, Duration::from_millis(1_500));
    }

    #[test]
    fn test_overrides() {
        let config = AdmissionConfig::from_lookup(lookup(&[
            ("RATE_LIMIT_MAX_REQUESTS", " 5 "),
            ("RATE_LIMIT_CLEAN_INTERVAL_MS", "2000"),
            ("RATE_LIMIT_SWEEP", "Scheduled"),
        ]))
        .unwrap();
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.clean_interval, Duration::from_millis(2_000));
        assert_eq!(config.sweep, SweepMode::Scheduled);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_MAX_REQUESTS", "lots")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "RATE_LIMIT_MAX_REQUESTS",
                value: "lots".to_string(),
            }
        );

        assert!(AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_SWEEP", "never")])).is_err());
        assert!(AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_WINDOW_MS", "-1")])).is_err());
    }

    #[test]
    fn test_rejects_zero() {
        let err = AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_WINDOW_MS", "0")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Zero("RATE_LIMIT_WINDOW_MS"));

        let err = AdmissionConfig::from_lookup(lookup(&[("RATE_LIMIT_MAX_REQUESTS", "0")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Zero("RATE_LIMIT_MAX_REQUESTS"));
    }
}
