//! Client identity used to bucket admission state.

use std::fmt;

/// Opaque identifier for a requester, typically its network address.
///
/// Equality is exact-string: `"10.0.0.1"` and `"10.0.0.1 "` are different
/// clients. No normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientKey(String);

impl ClientKey {
    /// Fallback key for requests whose origin cannot be resolved.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The shared bucket for clients without a resolvable address.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ClientKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(ClientKey::from("10.0.0.1"), ClientKey::new("10.0.0.1".to_string()));
        assert_ne!(ClientKey::from("10.0.0.1"), ClientKey::from("10.0.0.1 "));
        assert_ne!(ClientKey::from("::1"), ClientKey::from("::0001"));
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(ClientKey::unknown().as_str(), "unknown");
        assert_eq!(ClientKey::unknown().to_string(), ClientKey::UNKNOWN);
    }
}
