use crate::admission;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use verigate_core::models::{Project, SubmissionRecord, SubmitResponse};
use verigate_core::AppError;

#[utoipa::path(
    post,
    path = "/api/verify/{project_id}",
    tag = "verify",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = verigate_core::models::SubmissionPayload,
    responses(
        (status = 200, description = "Submission admitted", body = SubmitResponse),
        (status = 400, description = "Payload failed admission checks", body = ErrorResponse),
        (status = 403, description = "Project does not store submissions", body = ErrorResponse),
        (status = 404, description = "Project not found or inactive", body = ErrorResponse),
        (status = 413, description = "Per-file metadata ceiling exceeded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(project_id = %project_id, operation = "submit_verification"))]
pub async fn submit_verification(
    Path(project_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<Value>,
) -> Result<impl IntoResponse, HttpAppError> {
    let project = state
        .projects
        .get_active(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let payload = admission::validate_submission(
        &body,
        &project.config,
        state.config.max_metadata_bytes_per_file,
    )?;

    let record = SubmissionRecord {
        project_id,
        project_name: project.name.clone(),
        user_name: payload.user_name,
        user_email: payload.user_email,
        user_id: payload.user_id,
        submitted_at: Utc::now(),
        files: payload.files,
    };

    let submission_id = state.submissions.create(&record).await?;

    // Mail failure never rolls back the persisted submission.
    let email_sent = notify(&state, &project, &record).await;

    tracing::info!(
        %submission_id,
        file_count = record.files.len(),
        email_sent,
        "Submission admitted"
    );

    Ok(Json(SubmitResponse {
        success: true,
        submission_id,
        email_sent,
    }))
}

async fn notify(state: &AppState, project: &Project, record: &SubmissionRecord) -> bool {
    let Some(email) = &state.email else {
        return false;
    };
    let recipient = project
        .config
        .email_recipient
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let Some(recipient) = recipient else {
        return false;
    };

    match email.send_submission_notification(recipient, record).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Submission notification failed");
            false
        }
    }
}
