//! Application state - built once at startup and shared by every worker.

use std::sync::Arc;

use gamenight_infra::AdmissionGate;

use crate::config::AppConfig;
use crate::middleware::AdmissionMiddleware;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AdmissionGate>,
    pub trust_proxy: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let admission = &config.admission;
        let gate = Arc::new(AdmissionGate::new(admission));

        tracing::info!(
            window_ms = admission.window.as_millis() as u64,
            max_requests = admission.max_requests,
            ban_ms = admission.ban_duration.as_millis() as u64,
            clean_interval_ms = admission.clean_interval.as_millis() as u64,
            sweep = ?admission.sweep,
            trust_proxy = config.trust_proxy,
            "Admission gate initialized"
        );

        Self {
            gate,
            trust_proxy: config.trust_proxy,
        }
    }

    /// Middleware guarding every route with this state's gate.
    pub fn admission(&self) -> AdmissionMiddleware {
        AdmissionMiddleware::new(self.gate.clone(), self.trust_proxy)
    }
}
