//! Application state shared across handlers.

use sqlx::PgPool;
use verigate_core::Config;
use verigate_db::{ProjectRepository, SubmissionRepository};

use crate::services::email::EmailService;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub projects: ProjectRepository,
    pub submissions: SubmissionRepository,
    /// Absent when SMTP is not configured; notifications are skipped.
    pub email: Option<EmailService>,
}
