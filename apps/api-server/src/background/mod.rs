//! Background jobs.

mod scheduler;

use std::sync::Arc;

use gamenight_infra::AdmissionGate;
use tokio_cron_scheduler::JobSchedulerError;

pub use scheduler::Scheduler;

/// Sweep expired admission state every `every`, off the request path.
pub async fn start_admission_sweep(
    gate: Arc<AdmissionGate>,
    every: std::time::Duration,
) -> Result<Scheduler, JobSchedulerError> {
    let scheduler = Scheduler::new().await?;
    scheduler
        .add_repeated(every, move || {
            gate.sweep();
        })
        .await?;
    scheduler.start().await?;
    Ok(scheduler)
}
