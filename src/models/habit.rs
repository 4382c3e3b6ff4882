//! Habit tracker models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub text: String,
    pub due: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Newest first.
    #[serde(default)]
    pub done_dates: Vec<NaiveDate>,
    /// Hand-off token of the suggestion this habit was seeded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Habit {
    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.done_dates.contains(&date)
    }
}

/// Query parameters carried by a `/habits?seed=…&due=…&sid=…` link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSeed {
    #[serde(default)]
    pub seed: String,
    /// Kept as the raw string; anything that is not exactly `YYYY-MM-DD`
    /// falls back to the default seed due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}
