//! Decision journal models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub date: NaiveDate,
    pub decision: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub assumptions: String,
    #[serde(default)]
    pub next_action: String,
}

/// Form input before an id and date are assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDraft {
    pub id: Option<String>,
    pub decision: String,
    pub options: String,
    pub assumptions: String,
    pub next_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionGuidanceInput {
    pub title: String,
    pub domain: String,
    pub reversibility: String,
    /// 0-100
    pub confidence: u8,
    pub assumption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionGuidance {
    pub headline: String,
    pub next_step: String,
    pub guardrail: String,
    pub note: String,
}
