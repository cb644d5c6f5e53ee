use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use verigate_core::models::ProjectConfig;
use verigate_core::AppError;

/// Public view of a project: operator-only config fields are stripped.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProject {
    pub id: Uuid,
    pub name: String,
    pub config: ProjectConfig,
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = PublicProject),
        (status = 404, description = "Project not found or inactive", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(project_id = %id, operation = "get_project"))]
pub async fn get_project(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Inactive projects are indistinguishable from missing ones: the id is a
    // public identifier, not a credential.
    let project = state
        .projects
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok(Json(PublicProject {
        id: project.id,
        name: project.name,
        config: project.config.sanitized(),
    }))
}
