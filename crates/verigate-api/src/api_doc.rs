//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use verigate_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Verigate API",
        version = "0.1.0",
        description = "Media metadata verification and submission gating. Projects define declarative metadata requirements; clients pre-check files and the server re-validates every submission before storing it."
    ),
    paths(
        handlers::project_get::get_project,
        handlers::verify::submit_verification,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::project_get::PublicProject,
        models::FailureMode,
        models::FileVerdict,
        models::NormalizedMetadata,
        models::ProjectConfig,
        models::ProjectMode,
        models::RuleSpec,
        models::RuleStatus,
        models::RuleVerdict,
        models::SubmissionFile,
        models::SubmissionPayload,
        models::SubmitResponse,
    )),
    tags(
        (name = "projects", description = "Public project configuration"),
        (name = "verify", description = "Submission admission")
    )
)]
pub struct ApiDoc;
