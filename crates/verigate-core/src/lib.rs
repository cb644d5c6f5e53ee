//! Verigate Core Library
//!
//! This crate provides the domain models, rule evaluation, error types,
//! configuration, and identity validation shared across all Verigate
//! components.

pub mod config;
pub mod error;
pub mod models;
pub mod rules;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CameraInfo, FailureMode, FileVerdict, GpsPoint, MediaKind, NormalizedMetadata,
    OrientationLabel, Project, ProjectConfig, ProjectMode, RequirementSpec, Resolution,
    RuleSpec, RuleStatus, RuleVerdict, SubmissionFile, SubmissionPayload, SubmissionRecord,
    SubmitResponse, ValidationSummary,
};
pub use rules::evaluate;
