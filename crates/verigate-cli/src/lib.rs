use verigate_core::models::{FileVerdict, RuleStatus};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Best-effort content type from the file extension. Unknown extensions map
/// to application/octet-stream, which the extractor treats as unsupported.
pub fn guess_content_type(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "m4v" => "video/x-m4v",
        _ => "application/octet-stream",
    }
}

/// Render a per-file verdict for terminal output, one line per rule.
pub fn render_verdict(filename: &str, verdict: &FileVerdict) -> String {
    let mut out = String::new();
    let headline = if verdict.hard_pass { "PASS" } else { "FAIL" };
    out.push_str(&format!("{}  {}\n", headline, filename));

    for (rule, rule_verdict) in &verdict.per_rule {
        let marker = match rule_verdict.status {
            RuleStatus::Pass => "ok  ",
            RuleStatus::SoftFail => "soft",
            RuleStatus::Fail => "FAIL",
        };
        match &rule_verdict.message {
            Some(message) => out.push_str(&format!("  [{}] {}: {}\n", marker, rule, message)),
            None => out.push_str(&format!("  [{}] {}\n", marker, rule)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use verigate_core::models::{NormalizedMetadata, RequirementSpec};

    #[test]
    fn content_type_guessing() {
        assert_eq!(guess_content_type("shot.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("clip.mp4"), "video/mp4");
        assert_eq!(guess_content_type("notes.txt"), "application/octet-stream");
        assert_eq!(guess_content_type("no_extension"), "application/octet-stream");
    }

    #[test]
    fn verdict_rendering_names_failures() {
        let spec: RequirementSpec =
            serde_json::from_value(serde_json::json!({ "gps": { "required": true } }))
                .expect("spec");
        let verdict = verigate_core::evaluate(&NormalizedMetadata::unknown(), &spec);
        let rendered = render_verdict("shot.jpg", &verdict);
        assert!(rendered.starts_with("FAIL  shot.jpg"));
        assert!(rendered.contains("[FAIL] gps"));
    }
}
