//! Domain models shared across the client gate, the extractor, and the API.
//!
//! Models are grouped by concern: normalized media metadata, per-project
//! requirement specs, rule verdicts, project configuration, and the
//! submission wire records.

pub mod metadata;
pub mod project;
pub mod requirement;
pub mod submission;
pub mod verdict;

pub use metadata::{
    derive_orientation_label, displayed_resolution, orientation_transposes_axes, CameraInfo,
    GpsPoint, MediaKind, NormalizedMetadata, OrientationLabel, Resolution,
};
pub use project::{Project, ProjectConfig, ProjectMode};
pub use requirement::{FailureMode, RequirementSpec, RuleSpec};
pub use submission::{SubmissionFile, SubmissionPayload, SubmissionRecord, SubmitResponse};
pub use verdict::{FileVerdict, RuleStatus, RuleVerdict, ValidationSummary};
