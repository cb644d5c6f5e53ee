//! Application setup and initialization.

pub mod database;
pub mod routes;
pub mod server;

use crate::services::email::EmailService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use verigate_core::Config;
use verigate_db::{ProjectRepository, SubmissionRepository};

/// Initialize the entire application.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration.
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let email = EmailService::from_config(&config);

    let state = Arc::new(AppState {
        projects: ProjectRepository::new(pool.clone()),
        submissions: SubmissionRepository::new(pool.clone()),
        pool,
        email,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
