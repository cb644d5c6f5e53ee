use sqlx::PgPool;
use uuid::Uuid;
use verigate_core::models::SubmissionRecord;
use verigate_core::AppError;

/// Repository over the `submissions` table. The file list, including
/// per-file metadata and validation summaries, is stored verbatim as JSON
/// text for audit.
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist an admitted submission and return its generated id.
    #[tracing::instrument(
        skip(self, record),
        fields(
            db.table = "submissions",
            db.operation = "insert",
            project_id = %record.project_id,
            file_count = record.files.len()
        )
    )]
    pub async fn create(&self, record: &SubmissionRecord) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let files = serde_json::to_string(&record.files)?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, project_id, user_name, user_email, user_id, files, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(record.project_id)
        .bind(&record.user_name)
        .bind(&record.user_email)
        .bind(&record.user_id)
        .bind(&files)
        .bind(record.submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}
