//! Per-project requirement specification
//!
//! A requirement spec maps rule keys (`gps`, `timestamp`, `resolution`,
//! `orientation`, `cameraApp`, ...) to rule descriptors. Keys the evaluator
//! does not recognize are treated as always-passing no-ops so that older
//! deployments tolerate specs written for newer rule sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Whether a failing rule blocks submission eligibility or is advisory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Hard,
    Soft,
}

/// A single rule descriptor. Rule-specific parameters are optional and only
/// read by the rule they belong to; unknown parameters are preserved
/// round-trip in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub failure_mode: FailureMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // resolution rule parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_long_edge: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_short_edge: Option<u32>,

    // orientation rule parameter: expected label ("portrait" | "landscape")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RuleSpec {
    /// Hard-required rule with no parameters.
    pub fn required_hard() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Soft-required rule with no parameters.
    pub fn required_soft() -> Self {
        Self {
            required: true,
            failure_mode: FailureMode::Soft,
            ..Self::default()
        }
    }

    /// Whether the resolution rule carries orientation-agnostic edge bounds.
    /// A bound of zero constrains nothing and counts as absent, so specs
    /// that spell out `minLongEdge: 0` still fall back to width/height mode.
    pub fn has_edge_bounds(&self) -> bool {
        self.min_long_edge.unwrap_or(0) > 0 || self.min_short_edge.unwrap_or(0) > 0
    }
}

/// Rule key to rule descriptor. `BTreeMap` keeps evaluation order
/// deterministic, which keeps verdict output stable for tests and audits.
pub type RequirementSpec = BTreeMap<String, RuleSpec>;

/// Shape-check a requirement spec the way the project CRUD boundary does:
/// every entry must carry a boolean `required` and, when present, a
/// `failureMode` of `hard` or `soft`. Returns human-readable field errors.
pub fn validate_requirement_spec(raw: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(map) = raw.as_object() else {
        errors.push("metadataRequirements must be an object".to_string());
        return errors;
    };
    for (key, rule) in map {
        let Some(rule) = rule.as_object() else {
            errors.push(format!("metadataRequirements.{} must be an object", key));
            continue;
        };
        if !rule.get("required").map(Value::is_boolean).unwrap_or(false) {
            errors.push(format!(
                "metadataRequirements.{}.required must be boolean",
                key
            ));
        }
        if let Some(mode) = rule.get("failureMode") {
            if mode != "hard" && mode != "soft" {
                errors.push(format!(
                    "metadataRequirements.{}.failureMode must be hard|soft",
                    key
                ));
            }
        }
    }
    errors
}
