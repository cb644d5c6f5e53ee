//! Rule evaluation verdicts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome for a single rule. `Fail` only occurs for required hard rules,
/// `SoftFail` only for required soft rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    SoftFail,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RuleVerdict {
    pub status: RuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleVerdict {
    pub fn pass() -> Self {
        Self {
            status: RuleStatus::Pass,
            message: None,
        }
    }
}

/// Aggregate verdict for one file against one requirement spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileVerdict {
    pub per_rule: BTreeMap<String, RuleVerdict>,
    pub hard_failures: Vec<String>,
    pub soft_failures: Vec<String>,
    pub hard_pass: bool,
}

impl FileVerdict {
    /// The compact summary transmitted with a submission. Kept server-side
    /// for audit only; the server never trusts it.
    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            hard_failures: self.hard_failures.clone(),
            soft_failures: self.soft_failures.clone(),
            hard_pass: self.hard_pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub hard_failures: Vec<String>,
    pub soft_failures: Vec<String>,
    pub hard_pass: bool,
}
