use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use verigate_core::models::{Project, ProjectConfig};
use verigate_core::AppError;

/// A project row as stored. `config` is JSON text; parsing happens here so
/// callers only ever see a typed [`Project`].
#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub config: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn row_to_project(row: ProjectRow) -> Result<Project, AppError> {
    let config: ProjectConfig = serde_json::from_str(&row.config).map_err(|e| {
        AppError::Internal(format!("Project {} has unreadable config: {}", row.id, e))
    })?;
    Ok(Project {
        id: row.id,
        name: row.name,
        config,
        active: row.active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Repository over the `projects` table.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a project by id, treating inactive projects as absent. The
    /// public surface never distinguishes missing from deactivated.
    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    pub async fn get_active(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let row: Option<ProjectRow> = sqlx::query_as::<Postgres, ProjectRow>(
            r#"
            SELECT id, name, config, active, created_at, updated_at
            FROM projects
            WHERE id = $1 AND active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_project).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verigate_core::models::ProjectMode;

    fn row(config: &str) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            name: "Field survey".to_string(),
            config: config.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_parses_stored_config() {
        let project = row_to_project(row(
            r#"{
                "requiredFiles": 2,
                "maxFiles": 5,
                "allowedFileTypes": ["image/jpeg"],
                "metadataRequirements": { "gps": { "required": true } },
                "mode": "self_check"
            }"#,
        ))
        .expect("parse");
        assert_eq!(project.config.required_files, 2);
        assert_eq!(project.config.mode, ProjectMode::SelfCheck);
    }

    #[test]
    fn unreadable_config_is_an_internal_error() {
        let err = row_to_project(row("not json")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
