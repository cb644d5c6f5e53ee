pub mod project_get;
pub mod verify;
