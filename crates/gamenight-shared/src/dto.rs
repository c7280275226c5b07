//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Response for the health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}
