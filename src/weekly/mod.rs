//! Automatic weekly plan generated from the last 7 check-ins.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    coach::{propose_habits, suggest_weekly_best_move, summarize},
    log_info,
    models::{WeeklyPlan, WeeklySummary},
    storage::{
        self,
        migration::{migrate, PulseStressToCalm},
        Saved, Storage, WEEKLY_KEY,
    },
    utils::dates::monday_of_week,
};

const ENABLE_LOGS: bool = true;

/// Earlier builds stored a single plan object rather than a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredPlans {
    Many(Vec<WeeklyPlan>),
    One(WeeklyPlan),
}

impl From<StoredPlans> for Vec<WeeklyPlan> {
    fn from(stored: StoredPlans) -> Self {
        match stored {
            StoredPlans::Many(plans) => plans,
            StoredPlans::One(plan) => vec![plan],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDraft {
    pub week_start: NaiveDate,
    pub summary: WeeklySummary,
    pub best_move: String,
    /// Saved habits when this week is already planned, otherwise proposals.
    pub habits: Vec<String>,
    pub saved: Option<WeeklyPlan>,
}

#[derive(Clone)]
pub struct WeeklyPlanner {
    storage: Arc<dyn Storage>,
    max_plans: usize,
}

impl WeeklyPlanner {
    pub fn new(storage: Arc<dyn Storage>, max_plans: usize) -> Self {
        Self { storage, max_plans }
    }

    /// Stored plans, most recent week first.
    pub async fn plans(&self) -> Vec<WeeklyPlan> {
        let stored: Option<StoredPlans> =
            storage::load(self.storage.as_ref(), WEEKLY_KEY, None).await;
        stored.map(Vec::from).unwrap_or_default()
    }

    async fn summary(&self) -> WeeklySummary {
        let pulses = migrate(self.storage.as_ref(), &PulseStressToCalm).await;
        summarize(&pulses)
    }

    pub async fn draft(&self, today: NaiveDate) -> WeeklyDraft {
        let week_start = monday_of_week(today);
        let summary = self.summary().await;
        let best_move = suggest_weekly_best_move(&summary).to_string();

        let saved = self
            .plans()
            .await
            .into_iter()
            .find(|plan| plan.week_start == week_start);
        let habits = match &saved {
            Some(plan) if !plan.suggested_habits.is_empty() => plan.suggested_habits.clone(),
            _ => propose_habits(&summary),
        };

        WeeklyDraft {
            week_start,
            summary,
            best_move,
            habits,
            saved,
        }
    }

    /// Save a confirmed plan for the current week. Blank habit lines are
    /// dropped; an empty list keeps the proposed habits.
    pub async fn confirm(&self, habits: Vec<String>, today: NaiveDate) -> Saved<WeeklyPlan> {
        let week_start = monday_of_week(today);
        let summary = self.summary().await;

        let mut habits: Vec<String> = habits
            .into_iter()
            .map(|habit| habit.trim().to_string())
            .filter(|habit| !habit.is_empty())
            .collect();
        if habits.is_empty() {
            habits = propose_habits(&summary);
        }

        let plan = WeeklyPlan {
            week_start,
            created_at: Utc::now(),
            summary,
            suggested_best_move: suggest_weekly_best_move(&summary).to_string(),
            suggested_habits: habits,
            confirmed: true,
        };

        let mut plans: Vec<WeeklyPlan> = std::iter::once(plan.clone())
            .chain(
                self.plans()
                    .await
                    .into_iter()
                    .filter(|existing| existing.week_start != week_start),
            )
            .collect();
        plans.truncate(self.max_plans);

        let saved = storage::save(self.storage.as_ref(), WEEKLY_KEY, &plans).await;
        if saved {
            log_info!("weekly plan saved for week starting {week_start}");
        }
        Saved::new(plan, saved)
    }
}
