use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    coach::{self, Suggestion},
    habits::handoff,
    models::{DailyPulse, HabitSeed},
    storage::{
        self,
        migration::{migrate, PulseStressToCalm},
        new_token, Storage, PULSES_KEY,
    },
    utils::dates::add_days,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    /// Stored pulse for the day, or a neutral draft.
    pub draft: DailyPulse,
    pub already_checked_in: bool,
    pub suggestion: Suggestion,
    pub habit_link: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub saved: bool,
    pub pulse: DailyPulse,
    pub suggestion: Suggestion,
    pub habit_link: String,
}

/// Put `pulse` first, dropping any other entry for the same date, and keep
/// at most `cap` entries.
pub fn upsert_pulse(history: &[DailyPulse], pulse: DailyPulse, cap: usize) -> Vec<DailyPulse> {
    std::iter::once(pulse.clone())
        .chain(history.iter().filter(|p| p.date != pulse.date).cloned())
        .take(cap)
        .collect()
}

/// Daily check-in: one pulse per date, most recent first.
#[derive(Clone)]
pub struct TodayController {
    storage: Arc<dyn Storage>,
    max_pulses: usize,
}

impl TodayController {
    pub fn new(storage: Arc<dyn Storage>, max_pulses: usize) -> Self {
        Self {
            storage,
            max_pulses,
        }
    }

    /// Stored pulses, migrating the legacy stress-based records on first use.
    pub async fn history(&self) -> Vec<DailyPulse> {
        migrate(self.storage.as_ref(), &PulseStressToCalm).await
    }

    pub async fn load(&self, today: NaiveDate) -> Result<TodayView> {
        let history = self.history().await;
        let stored = history.iter().find(|p| p.date == today).cloned();
        let already_checked_in = stored.is_some();
        let draft = stored.unwrap_or_else(|| DailyPulse::neutral(today));

        let suggestion = self.suggest_over(&draft, &history);
        let habit_link = habit_link(&suggestion, today)?;

        Ok(TodayView {
            draft,
            already_checked_in,
            suggestion,
            habit_link,
        })
    }

    fn suggest_over(&self, pulse: &DailyPulse, history: &[DailyPulse]) -> Suggestion {
        let window = upsert_pulse(history, pulse.clone(), self.max_pulses);
        coach::suggest(pulse, &window)
    }

    /// Live suggestion for unsaved slider values.
    pub async fn preview(&self, pulse: &DailyPulse) -> Suggestion {
        let history = self.history().await;
        self.suggest_over(pulse, &history)
    }

    pub async fn save(&self, pulse: DailyPulse, today: NaiveDate) -> Result<SaveOutcome> {
        let history = self.history().await;
        let next = upsert_pulse(&history, pulse.clone(), self.max_pulses);
        let saved = storage::save(self.storage.as_ref(), PULSES_KEY, &next).await;

        let suggestion = coach::suggest(&pulse, &next);
        let habit_link = habit_link(&suggestion, today)?;

        Ok(SaveOutcome {
            saved,
            pulse,
            suggestion,
            habit_link,
        })
    }
}

/// Hand-off link that turns micro-step #1 into a habit due tomorrow.
pub fn habit_link(suggestion: &Suggestion, today: NaiveDate) -> Result<String> {
    let seed = HabitSeed::new(
        suggestion.recommendation.micro_steps.0.clone(),
        Some(add_days(today, 1)),
        Some(new_token("sid")),
    );
    handoff::to_link(&seed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        coach::RecommendationKind,
        models::Rating,
        storage::{MemoryStorage, PULSES_LEGACY_KEY},
        utils::dates::parse_iso_date,
    };

    fn date(value: &str) -> NaiveDate {
        parse_iso_date(value).expect("date")
    }

    fn pulse(day: &str, energy: u8, calm: u8, mood: u8, focus: u8) -> DailyPulse {
        DailyPulse {
            date: date(day),
            energy: Rating::new(energy).expect("rating"),
            calm: Rating::new(calm).expect("rating"),
            mood: Rating::new(mood).expect("rating"),
            focus: Rating::new(focus).expect("rating"),
        }
    }

    fn controller(storage: Arc<dyn Storage>) -> TodayController {
        TodayController::new(storage, 30)
    }

    #[tokio::test]
    async fn same_date_save_replaces() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let today = controller(storage.clone());
        let day = date("2024-06-01");

        today.save(pulse("2024-05-31", 3, 3, 3, 3), day).await.expect("save");
        today.save(pulse("2024-06-01", 1, 1, 1, 1), day).await.expect("save");
        let outcome = today
            .save(pulse("2024-06-01", 4, 4, 3, 5), day)
            .await
            .expect("save");
        assert!(outcome.saved);
        assert_eq!(
            outcome.suggestion.recommendation.kind,
            RecommendationKind::FocusSprint
        );

        let history = today.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], pulse("2024-06-01", 4, 4, 3, 5));
        assert_eq!(history[1].date, date("2024-05-31"));
    }

    #[test]
    fn history_is_capped_oldest_first() {
        let base = date("2024-01-01");
        let history: Vec<_> = (0..30)
            .rev()
            .map(|offset| DailyPulse::neutral(add_days(base, offset)))
            .collect();

        let next = upsert_pulse(&history, DailyPulse::neutral(add_days(base, 30)), 30);
        assert_eq!(next.len(), 30);
        assert_eq!(next[0].date, add_days(base, 30));
        assert_eq!(next[29].date, add_days(base, 1));
    }

    #[tokio::test]
    async fn load_prefills_stored_pulse_or_neutral() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let today = controller(storage);
        let day = date("2024-06-01");

        let view = today.load(day).await.expect("load");
        assert!(!view.already_checked_in);
        assert_eq!(view.draft, DailyPulse::neutral(day));
        assert_eq!(
            view.suggestion.recommendation.kind,
            RecommendationKind::MaintainMomentum
        );

        today.save(pulse("2024-06-01", 2, 4, 3, 3), day).await.expect("save");
        let view = today.load(day).await.expect("load");
        assert!(view.already_checked_in);
        assert_eq!(view.draft.energy.value(), 2);
    }

    #[tokio::test]
    async fn load_migrates_legacy_pulses() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                PULSES_LEGACY_KEY,
                &json!([{"date": "2024-06-01", "energy": 4, "stress": 5, "mood": 4, "focus": 4}])
                    .to_string(),
            )
            .await
            .expect("seed");
        let today = controller(storage);

        let view = today.load(date("2024-06-01")).await.expect("load");
        assert!(view.already_checked_in);
        assert_eq!(view.draft.calm.value(), 1);
        assert_eq!(
            view.suggestion.recommendation.kind,
            RecommendationKind::StressReset
        );
    }

    #[tokio::test]
    async fn save_keeps_history_with_an_out_of_range_record() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage
            .set(
                PULSES_KEY,
                &json!([
                    {"date": "2024-06-02", "energy": 4, "calm": 4, "mood": 4, "focus": 4},
                    {"date": "2024-06-01", "energy": 3, "calm": 6, "mood": 3, "focus": 3}
                ])
                .to_string(),
            )
            .await
            .expect("seed v2");
        storage
            .set(PULSES_LEGACY_KEY, &json!([{"date": "2023-01-01", "stress": 3}]).to_string())
            .await
            .expect("seed legacy");
        let today = controller(storage);

        today
            .save(pulse("2024-06-03", 3, 3, 3, 3), date("2024-06-03"))
            .await
            .expect("save");

        let dates: Vec<_> = today.history().await.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2024-06-03"), date("2024-06-02"), date("2024-06-01")]);
    }

    #[tokio::test]
    async fn habit_link_carries_first_micro_step_due_tomorrow() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let today = controller(storage);
        let day = date("2024-06-01");

        let outcome = today
            .save(pulse("2024-06-01", 3, 1, 3, 3), day)
            .await
            .expect("save");
        let seed = handoff::parse_link(&outcome.habit_link).expect("parse");
        assert_eq!(seed.seed, "2 min breathing (box breathing)");
        assert_eq!(seed.due.as_deref(), Some("2024-06-02"));
        assert!(seed.token().map_or(false, |sid| sid.starts_with("sid_")));
    }

    #[tokio::test]
    async fn preview_does_not_persist() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let today = controller(storage.clone());

        let suggestion = today.preview(&pulse("2024-06-01", 1, 3, 3, 3)).await;
        assert_eq!(
            suggestion.recommendation.kind,
            RecommendationKind::EnergyRecovery
        );
        assert!(storage.get(PULSES_KEY).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn unavailable_storage_reports_unsaved() {
        let today = controller(Arc::new(MemoryStorage::unavailable()));
        let outcome = today
            .save(pulse("2024-06-01", 3, 3, 3, 3), date("2024-06-01"))
            .await
            .expect("save never errors on storage failure");
        assert!(!outcome.saved);
    }
}
