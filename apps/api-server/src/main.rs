//! # Gamenight API Server
//!
//! The main entry point for the Actix-web HTTP server. Every route sits
//! behind the admission gate.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use gamenight_infra::SweepMode;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;

    tracing::info!(
        "Starting Gamenight API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config);

    #[cfg(feature = "scheduler")]
    let mut scheduler = match config.admission.sweep {
        SweepMode::Scheduled => Some(
            background::start_admission_sweep(state.gate.clone(), config.admission.clean_interval)
                .await?,
        ),
        SweepMode::Inline => None,
    };

    #[cfg(not(feature = "scheduler"))]
    if config.admission.sweep == SweepMode::Scheduled {
        anyhow::bail!("RATE_LIMIT_SWEEP=scheduled requires the `scheduler` feature");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(state.admission())
            .wrap(TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    Ok(())
}
