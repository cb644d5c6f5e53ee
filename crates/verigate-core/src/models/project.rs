//! Project configuration models
//!
//! Project CRUD is an external collaborator; these models only describe the
//! config shape the gating pipeline consumes and the field checks performed
//! when a config crosses that boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::requirement::{validate_requirement_spec, RequirementSpec};

/// Project mode. Self-check projects never persist submissions; validation is
/// purely advisory to the uploader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectMode {
    #[default]
    Audit,
    SelfCheck,
}

/// Per-project requirement configuration, read-only to the gating core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub required_files: u32,
    pub max_files: u32,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    #[serde(default)]
    pub metadata_requirements: RequirementSpec,
    #[serde(default)]
    pub mode: ProjectMode,
    /// Free-form uploader instructions, rendered by the UI only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Value>,
    /// Notification recipient. Stripped from public responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_recipient: Option<String>,
}

impl ProjectConfig {
    /// Whether successful submissions are persisted at all.
    pub fn stores_submissions(&self) -> bool {
        self.mode != ProjectMode::SelfCheck
    }

    /// Copy with operator-only fields removed, safe for public responses.
    pub fn sanitized(&self) -> Self {
        Self {
            email_recipient: None,
            ..self.clone()
        }
    }

    /// Field checks applied when a config crosses the project CRUD boundary.
    /// Returns every violation rather than stopping at the first.
    pub fn validate_fields(raw: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(obj) = raw.as_object() else {
            return vec!["config must be an object".to_string()];
        };

        if let Some(mode) = obj.get("mode") {
            if mode != "audit" && mode != "self_check" {
                errors.push("mode must be audit|self_check if provided".to_string());
            }
        }

        let required_files = obj.get("requiredFiles").and_then(Value::as_u64);
        match required_files {
            Some(n) if n >= 1 => {}
            _ => errors.push("requiredFiles must be an integer >= 1".to_string()),
        }
        match (obj.get("maxFiles").and_then(Value::as_u64), required_files) {
            (Some(max), Some(min)) if max >= min => {}
            (Some(_), None) => {}
            _ => errors.push("maxFiles must be an integer >= requiredFiles".to_string()),
        }

        let types_ok = obj
            .get("allowedFileTypes")
            .and_then(Value::as_array)
            .map(|a| a.iter().all(Value::is_string))
            .unwrap_or(false);
        if !types_ok {
            errors.push("allowedFileTypes must be an array of strings".to_string());
        }

        match obj.get("metadataRequirements") {
            Some(reqs) => errors.extend(validate_requirement_spec(reqs)),
            None => errors.push("metadataRequirements must be an object".to_string()),
        }

        if let Some(instructions) = obj.get("instructions") {
            if !instructions.is_object() {
                errors.push("instructions must be an object if provided".to_string());
            }
        }
        if let Some(recipient) = obj.get("emailRecipient") {
            if !recipient.is_string() {
                errors.push("emailRecipient must be a string if provided".to_string());
            }
        }

        errors
    }
}

/// A project row as read from storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub config: ProjectConfig,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_config() -> Value {
        json!({
            "requiredFiles": 1,
            "maxFiles": 3,
            "allowedFileTypes": ["image/jpeg"],
            "metadataRequirements": { "gps": { "required": true } },
        })
    }

    #[test]
    fn minimal_config_passes_field_checks() {
        assert!(ProjectConfig::validate_fields(&minimal_config()).is_empty());
    }

    #[test]
    fn decodes_wire_shape() {
        let config: ProjectConfig = serde_json::from_value(minimal_config()).expect("decode");
        assert_eq!(config.required_files, 1);
        assert_eq!(config.max_files, 3);
        assert_eq!(config.mode, ProjectMode::Audit);
        assert!(config.stores_submissions());
        assert!(config.metadata_requirements.contains_key("gps"));
    }

    #[test]
    fn self_check_mode_disables_storage() {
        let mut raw = minimal_config();
        raw["mode"] = json!("self_check");
        let config: ProjectConfig = serde_json::from_value(raw).expect("decode");
        assert_eq!(config.mode, ProjectMode::SelfCheck);
        assert!(!config.stores_submissions());
    }

    #[test]
    fn rejects_max_files_below_required_files() {
        let mut raw = minimal_config();
        raw["maxFiles"] = json!(0);
        let errors = ProjectConfig::validate_fields(&raw);
        assert!(errors.iter().any(|e| e.contains("maxFiles")));
    }

    #[test]
    fn rejects_bad_mode_and_types() {
        let mut raw = minimal_config();
        raw["mode"] = json!("dry_run");
        raw["allowedFileTypes"] = json!([1]);
        let errors = ProjectConfig::validate_fields(&raw);
        assert!(errors.iter().any(|e| e.contains("mode")));
        assert!(errors.iter().any(|e| e.contains("allowedFileTypes")));
    }

    #[test]
    fn sanitized_config_drops_recipient() {
        let mut raw = minimal_config();
        raw["emailRecipient"] = json!("ops@example.com");
        let config: ProjectConfig = serde_json::from_value(raw).expect("decode");
        assert!(config.email_recipient.is_some());
        let public = config.sanitized();
        assert!(public.email_recipient.is_none());
        assert_eq!(public.max_files, config.max_files);
    }
}
