//! Submission wire records
//!
//! `SubmissionPayload` is what a client transmits; it is constructed fresh
//! per submit attempt and never mutated after transmission. File metadata and
//! validation summaries travel as raw JSON objects so the server can bound,
//! audit, and persist exactly what was received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// One file entry inside a submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionFile {
    pub filename: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    /// Normalized metadata as captured client-side, kept as raw JSON.
    pub metadata: Value,
    /// Client-side validation summary, audit-only.
    pub validation: Value,
}

/// The wire record a client submits for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub user_name: String,
    pub user_email: String,
    pub user_id: String,
    pub files: Vec<SubmissionFile>,
}

/// The record handed to the submission store after admission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub project_id: Uuid,
    pub project_name: String,
    pub user_name: String,
    pub user_email: String,
    pub user_id: String,
    pub submitted_at: DateTime<Utc>,
    pub files: Vec<SubmissionFile>,
}

/// Response returned by the admission gate on success.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub submission_id: Uuid,
    pub email_sent: bool,
}
