//! Database repositories for the verification service
//!
//! Each repository owns one domain entity. Project and submission documents
//! are stored as JSON text and parsed into typed models at the repository
//! boundary, so nothing above this layer touches raw rows.

pub mod projects;
pub mod submissions;

pub use projects::ProjectRepository;
pub use submissions::SubmissionRepository;
