//! Server-side admission checks for submission payloads.
//!
//! The server never trusts client-computed verdicts: everything structural is
//! re-checked here against the project config fetched at request time. Checks
//! run on the raw JSON body so rejections can name the offending field the
//! way clients sent it; the typed payload is only built once every check has
//! passed.

use serde_json::Value;
use verigate_core::models::{ProjectConfig, SubmissionFile, SubmissionPayload};
use verigate_core::validation::{is_valid_email, is_valid_user_id};
use verigate_core::AppError;

fn normalize_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Validate a raw submission body against the project's requirement config
/// and the per-file metadata ceiling. Returns the typed payload on success.
///
/// The storage-mode check comes first: self-check projects reject every
/// payload, valid or not, before any field is looked at.
pub fn validate_submission(
    body: &Value,
    config: &ProjectConfig,
    max_metadata_bytes_per_file: usize,
) -> Result<SubmissionPayload, AppError> {
    if !config.stores_submissions() {
        return Err(AppError::Forbidden(
            "This project is self-check only; submissions are not stored.".to_string(),
        ));
    }

    let Some(obj) = body.as_object() else {
        return Err(AppError::BadRequest("Invalid JSON body".to_string()));
    };

    let user_name = normalize_string(obj.get("userName"));
    let user_email = normalize_string(obj.get("userEmail"));
    let user_id = normalize_string(obj.get("userId"));

    if user_name.is_empty() || user_email.is_empty() || user_id.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email, and user ID are required".to_string(),
        ));
    }
    if !is_valid_email(&user_email) {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }
    if !is_valid_user_id(&user_id) {
        return Err(AppError::BadRequest(
            "User ID must contain only numbers".to_string(),
        ));
    }

    let files = match obj.get("files").and_then(Value::as_array) {
        Some(files) if !files.is_empty() => files,
        _ => {
            return Err(AppError::BadRequest(
                "At least one file is required".to_string(),
            ))
        }
    };

    // Count bounds come from the project config, never from the payload.
    if files.len() < config.required_files as usize {
        return Err(AppError::BadRequest(format!(
            "At least {} files are required",
            config.required_files
        )));
    }
    if config.max_files > 0 && files.len() > config.max_files as usize {
        return Err(AppError::BadRequest(format!(
            "Maximum {} files allowed",
            config.max_files
        )));
    }

    let mut validated = Vec::with_capacity(files.len());
    for file in files {
        validated.push(validate_file(
            file,
            &config.allowed_file_types,
            max_metadata_bytes_per_file,
        )?);
    }

    Ok(SubmissionPayload {
        user_name,
        user_email,
        user_id,
        files: validated,
    })
}

fn validate_file(
    file: &Value,
    allowed_types: &[String],
    max_metadata_bytes: usize,
) -> Result<SubmissionFile, AppError> {
    let Some(obj) = file.as_object() else {
        return Err(AppError::BadRequest("Invalid file entry".to_string()));
    };

    let filename = match obj.get("filename").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(AppError::BadRequest(
                "File filename is required".to_string(),
            ))
        }
    };
    let content_type = match obj.get("type").and_then(Value::as_str) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(AppError::BadRequest("File type is required".to_string())),
    };
    if !allowed_types.is_empty() && !allowed_types.iter().any(|t| t == &content_type) {
        return Err(AppError::BadRequest(format!(
            "File type not allowed: {}",
            content_type
        )));
    }

    let size = match obj.get("size").and_then(Value::as_f64) {
        Some(size) if size.is_finite() && size >= 0.0 => size as u64,
        _ => {
            return Err(AppError::BadRequest(
                "File size must be a non-negative number".to_string(),
            ))
        }
    };

    let metadata = match obj.get("metadata") {
        Some(metadata) if metadata.is_object() => metadata.clone(),
        _ => {
            return Err(AppError::BadRequest(
                "File metadata must be an object".to_string(),
            ))
        }
    };
    let validation = match obj.get("validation") {
        Some(validation) if validation.is_object() => validation.clone(),
        _ => {
            return Err(AppError::BadRequest(
                "File validation must be an object".to_string(),
            ))
        }
    };

    // Per-file ceiling, independent of the aggregate request cap applied at
    // the transport boundary. Reported with the exact byte count so callers
    // know how far over they are.
    let metadata_bytes = serde_json::to_string(&metadata)?.len();
    if metadata_bytes > max_metadata_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File metadata too large ({} bytes). Reduce captured EXIF/debug fields and try again.",
            metadata_bytes
        )));
    }

    Ok(SubmissionFile {
        filename,
        content_type,
        size,
        metadata,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAX_METADATA_BYTES: usize = 64 * 1024;

    fn config() -> ProjectConfig {
        serde_json::from_value(json!({
            "requiredFiles": 2,
            "maxFiles": 3,
            "allowedFileTypes": ["image/jpeg", "video/mp4"],
            "metadataRequirements": { "gps": { "required": true } },
        }))
        .expect("config")
    }

    fn file_entry(filename: &str) -> Value {
        json!({
            "filename": filename,
            "type": "image/jpeg",
            "size": 2048,
            "metadata": { "kind": "image" },
            "validation": { "hardPass": true },
        })
    }

    fn body(file_count: usize) -> Value {
        let files: Vec<Value> = (0..file_count)
            .map(|i| file_entry(&format!("shot{}.jpg", i)))
            .collect();
        json!({
            "userName": "Ada",
            "userEmail": "ada@example.com",
            "userId": "12345",
            "files": files,
        })
    }

    fn validate(body: &Value) -> Result<SubmissionPayload, AppError> {
        validate_submission(body, &config(), MAX_METADATA_BYTES)
    }

    #[test]
    fn well_formed_payload_is_admitted() {
        let payload = validate(&body(2)).expect("admit");
        assert_eq!(payload.user_name, "Ada");
        assert_eq!(payload.files.len(), 2);
        assert_eq!(payload.files[0].content_type, "image/jpeg");
    }

    #[test]
    fn identity_fields_are_trimmed_before_checks() {
        let mut raw = body(2);
        raw["userName"] = json!("  Ada  ");
        raw["userId"] = json!(" 12345 ");
        let payload = validate(&raw).expect("admit");
        assert_eq!(payload.user_name, "Ada");
        assert_eq!(payload.user_id, "12345");
    }

    #[test]
    fn blank_identity_fields_are_rejected() {
        let mut raw = body(2);
        raw["userName"] = json!("   ");
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Name, email, and user ID are required"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut raw = body(2);
        raw["userEmail"] = json!("ada@nodot");
        let err = validate(&raw).unwrap_err();
        assert!(err.to_string().contains("Invalid email format"));
    }

    #[test]
    fn non_numeric_user_id_is_rejected() {
        let mut raw = body(2);
        raw["userId"] = json!("abc123");
        let err = validate(&raw).unwrap_err();
        assert!(err.to_string().contains("only numbers"));
    }

    #[test]
    fn empty_file_list_is_rejected() {
        let mut raw = body(2);
        raw["files"] = json!([]);
        let err = validate(&raw).unwrap_err();
        assert!(err.to_string().contains("At least one file is required"));
    }

    #[test]
    fn count_bounds_come_from_project_config() {
        // requiredFiles = 2: a single file is short even if the client
        // claims otherwise.
        let err = validate(&body(1)).unwrap_err();
        assert!(err.to_string().contains("At least 2 files are required"));

        let err = validate(&body(4)).unwrap_err();
        assert!(err.to_string().contains("Maximum 3 files allowed"));
    }

    #[test]
    fn disallowed_content_type_is_rejected() {
        let mut raw = body(2);
        raw["files"][1]["type"] = json!("application/pdf");
        let err = validate(&raw).unwrap_err();
        assert!(err
            .to_string()
            .contains("File type not allowed: application/pdf"));
    }

    #[test]
    fn empty_allowed_list_admits_any_type() {
        let mut cfg = config();
        cfg.allowed_file_types.clear();
        let mut raw = body(2);
        raw["files"][0]["type"] = json!("application/octet-stream");
        assert!(validate_submission(&raw, &cfg, MAX_METADATA_BYTES).is_ok());
    }

    #[test]
    fn negative_and_non_numeric_sizes_are_rejected() {
        let mut raw = body(2);
        raw["files"][0]["size"] = json!(-1);
        assert!(validate(&raw)
            .unwrap_err()
            .to_string()
            .contains("non-negative"));

        raw["files"][0]["size"] = json!("big");
        assert!(validate(&raw)
            .unwrap_err()
            .to_string()
            .contains("non-negative"));
    }

    #[test]
    fn metadata_and_validation_must_be_objects() {
        let mut raw = body(2);
        raw["files"][0]["metadata"] = json!("stripped");
        assert!(validate(&raw)
            .unwrap_err()
            .to_string()
            .contains("File metadata must be an object"));

        let mut raw = body(2);
        raw["files"][1]["validation"] = json!(null);
        assert!(validate(&raw)
            .unwrap_err()
            .to_string()
            .contains("File validation must be an object"));
    }

    #[test]
    fn oversized_metadata_reports_exact_byte_count() {
        let mut raw = body(2);
        let blob = "x".repeat(MAX_METADATA_BYTES);
        raw["files"][0]["metadata"] = json!({ "debug": blob });
        let expected_bytes =
            serde_json::to_string(&raw["files"][0]["metadata"]).expect("encode").len();

        let err = validate(&raw).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(err
            .to_string()
            .contains(&format!("({} bytes)", expected_bytes)));
    }

    #[test]
    fn metadata_at_the_ceiling_is_admitted() {
        let mut raw = body(2);
        // {"debug":"xx...x"} serializes to 12 + len bytes.
        let blob = "x".repeat(MAX_METADATA_BYTES - 12);
        raw["files"][0]["metadata"] = json!({ "debug": blob });
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn client_validation_summaries_are_kept_verbatim() {
        let mut raw = body(2);
        raw["files"][0]["validation"] = json!({ "hardPass": false, "hardFailures": ["gps"] });
        let payload = validate(&raw).expect("admit");
        // Stored for audit; admission never consults hardPass.
        assert_eq!(payload.files[0].validation["hardPass"], false);
    }

    #[test]
    fn self_check_projects_reject_any_payload() {
        let mut cfg = config();
        cfg.mode = verigate_core::models::ProjectMode::SelfCheck;

        // A fully valid payload is still refused.
        let err = validate_submission(&body(2), &cfg, MAX_METADATA_BYTES).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(err.to_string().contains("self-check only"));

        // So is garbage: the mode gate fires before any field check.
        let err = validate_submission(&json!("not even an object"), &cfg, MAX_METADATA_BYTES)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON body"));
    }
}
