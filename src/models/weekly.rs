//! Weekly plan models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Averages over the most recent (up to 7) pulses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub avg_energy: f64,
    pub avg_calm: f64,
    pub avg_mood: f64,
    pub avg_focus: f64,
    pub count_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    /// Monday of the plan's week.
    pub week_start: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub summary: WeeklySummary,
    pub suggested_best_move: String,
    #[serde(default)]
    pub suggested_habits: Vec<String>,
    #[serde(default)]
    pub confirmed: bool,
}
