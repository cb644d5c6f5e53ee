//! Rule evaluation
//!
//! Evaluates a normalized metadata record against a requirement spec and
//! produces a per-rule verdict plus the aggregate hard-pass flag. Evaluation
//! never fails: missing data is a deterministic rule failure, not an error.

use crate::models::{
    FailureMode, FileVerdict, NormalizedMetadata, RequirementSpec, RuleSpec, RuleStatus,
    RuleVerdict,
};

/// Closed enumeration of the rules the evaluator understands. Keys outside
/// this set map to `Unknown`, which always passes; that leniency is a
/// forward-compatibility contract, not an omission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Gps,
    Timestamp,
    Resolution,
    Orientation,
    CameraApp,
    Unknown,
}

impl RuleKind {
    fn from_key(key: &str) -> Self {
        match key {
            "gps" => RuleKind::Gps,
            "timestamp" => RuleKind::Timestamp,
            "resolution" => RuleKind::Resolution,
            "orientation" => RuleKind::Orientation,
            "cameraApp" => RuleKind::CameraApp,
            _ => RuleKind::Unknown,
        }
    }
}

struct RuleOutcome {
    pass: bool,
    message: Option<String>,
}

impl RuleOutcome {
    fn pass() -> Self {
        Self {
            pass: true,
            message: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            pass: false,
            message: Some(message.into()),
        }
    }
}

fn check_gps(metadata: &NormalizedMetadata) -> RuleOutcome {
    match metadata.gps {
        Some(gps) if gps.is_finite() => RuleOutcome::pass(),
        _ => RuleOutcome::fail("GPS coordinates not detected"),
    }
}

fn check_timestamp(metadata: &NormalizedMetadata) -> RuleOutcome {
    if metadata.timestamp.is_some() {
        RuleOutcome::pass()
    } else {
        RuleOutcome::fail("Capture timestamp not detected")
    }
}

fn check_resolution(metadata: &NormalizedMetadata, rule: &RuleSpec) -> RuleOutcome {
    let Some(res) = metadata.resolution else {
        return RuleOutcome::fail("Resolution not detected");
    };
    if rule.has_edge_bounds() {
        // Orientation-agnostic bounds: compare long edge to long bound and
        // short edge to short bound regardless of which axis is which.
        let min_long = rule.min_long_edge.unwrap_or(0);
        let min_short = rule.min_short_edge.unwrap_or(0);
        if res.long_edge() >= min_long && res.short_edge() >= min_short {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail(format!(
                "Need long edge \u{2265} {} and short edge \u{2265} {}. Detected {}\u{d7}{}.",
                min_long, min_short, res.width, res.height
            ))
        }
    } else {
        let min_width = rule.min_width.unwrap_or(0);
        let min_height = rule.min_height.unwrap_or(0);
        if res.width >= min_width && res.height >= min_height {
            RuleOutcome::pass()
        } else {
            RuleOutcome::fail(format!(
                "Need at least {}\u{d7}{}. Detected {}\u{d7}{}.",
                min_width, min_height, res.width, res.height
            ))
        }
    }
}

fn check_orientation(metadata: &NormalizedMetadata, rule: &RuleSpec) -> RuleOutcome {
    let Some(label) = metadata.orientation_label else {
        return RuleOutcome::fail("Orientation not detected");
    };
    let expected = rule.value.as_deref().unwrap_or("");
    if expected != "portrait" && expected != "landscape" {
        // Anything other than the two meaningful expectations is a no-op.
        return RuleOutcome::pass();
    }
    if label.as_str() == expected {
        RuleOutcome::pass()
    } else {
        RuleOutcome::fail(format!("Expected {}. Detected {}.", expected, label.as_str()))
    }
}

fn run_rule(kind: RuleKind, metadata: &NormalizedMetadata, rule: &RuleSpec) -> RuleOutcome {
    match kind {
        RuleKind::Gps => check_gps(metadata),
        RuleKind::Timestamp => check_timestamp(metadata),
        RuleKind::Resolution => check_resolution(metadata, rule),
        RuleKind::Orientation => check_orientation(metadata, rule),
        // Best-effort heuristic left permissive on purpose: EXIF software
        // tags are trivially spoofed or stripped, so enforcement would only
        // punish honest uploads.
        RuleKind::CameraApp => RuleOutcome::pass(),
        RuleKind::Unknown => RuleOutcome::pass(),
    }
}

/// Evaluate a metadata record against a requirement spec.
///
/// Rules with `required: false` are skipped entirely. Failing required rules
/// are routed to hard or soft failure lists per their failure mode; soft
/// failures never affect `hard_pass`.
pub fn evaluate(metadata: &NormalizedMetadata, spec: &RequirementSpec) -> FileVerdict {
    let mut per_rule = std::collections::BTreeMap::new();
    let mut hard_failures = Vec::new();
    let mut soft_failures = Vec::new();

    for (key, rule) in spec {
        if !rule.required {
            continue;
        }
        let outcome = run_rule(RuleKind::from_key(key), metadata, rule);
        let verdict = if outcome.pass {
            RuleVerdict::pass()
        } else {
            match rule.failure_mode {
                FailureMode::Soft => {
                    soft_failures.push(key.clone());
                    RuleVerdict {
                        status: RuleStatus::SoftFail,
                        message: outcome.message,
                    }
                }
                FailureMode::Hard => {
                    hard_failures.push(key.clone());
                    RuleVerdict {
                        status: RuleStatus::Fail,
                        message: outcome.message,
                    }
                }
            }
        };
        per_rule.insert(key.clone(), verdict);
    }

    let hard_pass = hard_failures.is_empty();
    FileVerdict {
        per_rule,
        hard_failures,
        soft_failures,
        hard_pass,
    }
}
