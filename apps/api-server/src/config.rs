//! Application configuration loaded from environment variables.

use std::env;

use gamenight_core::ConfigError;
use gamenight_infra::AdmissionConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Key clients on `Forwarded`/`X-Forwarded-For`. Only safe behind a
    /// proxy that overwrites those headers.
    pub trust_proxy: bool,
    pub admission: AdmissionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: value.clone(),
            })?,
            None => 8080,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            trust_proxy: lookup("RATE_LIMIT_TRUST_PROXY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            admission: AdmissionConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_: &str| None).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.trust_proxy);
        assert_eq!(config.admission, AdmissionConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(|var: &str| match var {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("9000".to_string()),
            "RATE_LIMIT_TRUST_PROXY" => Some("1".to_string()),
            "RATE_LIMIT_WINDOW_MS" => Some("30000".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.trust_proxy);
        assert_eq!(config.admission.window, Duration::from_secs(30));
        assert_eq!(config.admission.ban_duration, Duration::from_secs(150));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(|var: &str| (var == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "http".to_string(),
            }
        );
    }
}
