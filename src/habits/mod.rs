use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

pub mod handoff;

use crate::{
    log_info,
    models::{Habit, HabitSeed},
    settings::HabitDefaults,
    storage::{self, Saved, Storage, HABITS_KEY},
    utils::dates::add_days,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "habit")]
pub enum SeedOutcome {
    Inserted(Saved<Habit>),
    /// A habit with the same token (or text and due date) already exists.
    Duplicate,
    /// The link carried no usable seed text.
    Ignored,
}

/// Habit list stored newest first under `pf_habits_v2`.
#[derive(Clone)]
pub struct HabitTracker {
    storage: Arc<dyn Storage>,
    max_habits: usize,
    defaults: HabitDefaults,
}

impl HabitTracker {
    pub fn new(storage: Arc<dyn Storage>, max_habits: usize, defaults: HabitDefaults) -> Self {
        Self {
            storage,
            max_habits,
            defaults,
        }
    }

    pub async fn list(&self) -> Vec<Habit> {
        storage::load(self.storage.as_ref(), HABITS_KEY, Vec::new()).await
    }

    /// Habits ordered by due date, earliest first.
    pub async fn upcoming(&self) -> Vec<Habit> {
        let mut habits = self.list().await;
        habits.sort_by(|a, b| a.due.cmp(&b.due));
        habits
    }

    async fn persist(&self, mut habits: Vec<Habit>) -> bool {
        habits.truncate(self.max_habits);
        storage::save(self.storage.as_ref(), HABITS_KEY, &habits).await
    }

    fn new_habit(text: &str, due: NaiveDate, source_id: Option<String>) -> Habit {
        Habit {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            due,
            created_at: Utc::now(),
            done_dates: Vec::new(),
            source_id,
        }
    }

    /// Add a habit by hand. Blank text is a no-op.
    pub async fn add(
        &self,
        text: &str,
        due: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<Saved<Habit>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let due = due.unwrap_or_else(|| add_days(today, self.defaults.manual_due_days));
        let habit = Self::new_habit(text, due, None);

        let mut habits = self.list().await;
        habits.insert(0, habit.clone());
        let saved = self.persist(habits).await;

        log_info!("added habit {} due {} (saved: {saved})", habit.id, habit.due);
        Some(Saved::new(habit, saved))
    }

    /// Insert the habit carried by a hand-off link unless it was already
    /// inserted from the same link.
    pub async fn seed(&self, seed: &HabitSeed, today: NaiveDate) -> SeedOutcome {
        let Some(text) = seed.text() else {
            return SeedOutcome::Ignored;
        };
        let due = seed.resolve_due(today, self.defaults.seed_due_days);
        let sid = seed.token();

        let mut habits = self.list().await;
        if handoff::is_duplicate(&habits, text, due, sid) {
            log_info!("skipping duplicate habit seed (sid: {:?})", sid);
            return SeedOutcome::Duplicate;
        }

        let habit = Self::new_habit(text, due, sid.map(str::to_string));
        habits.insert(0, habit.clone());
        let saved = self.persist(habits).await;

        log_info!("seeded habit {} from hand-off (saved: {saved})", habit.id);
        SeedOutcome::Inserted(Saved::new(habit, saved))
    }

    /// Mark or unmark `today` as done for the habit.
    pub async fn toggle_done(&self, id: &str, today: NaiveDate) -> Result<Saved<Habit>> {
        let mut habits = self.list().await;
        let Some(habit) = habits.iter_mut().find(|habit| habit.id == id) else {
            bail!("habit '{id}' not found");
        };

        if habit.is_done_on(today) {
            habit.done_dates.retain(|date| *date != today);
        } else {
            habit.done_dates.insert(0, today);
        }
        let updated = habit.clone();

        let saved = self.persist(habits).await;
        Ok(Saved::new(updated, saved))
    }

    /// Delete by id. Returns whether the shortened list was stored.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut habits = self.list().await;
        let before = habits.len();
        habits.retain(|habit| habit.id != id);
        if habits.len() == before {
            bail!("habit '{id}' not found");
        }

        Ok(self.persist(habits).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStorage, utils::dates::parse_iso_date};

    fn date(value: &str) -> NaiveDate {
        parse_iso_date(value).expect("date")
    }

    fn tracker() -> HabitTracker {
        HabitTracker::new(Arc::new(MemoryStorage::new()), 200, HabitDefaults::default())
    }

    #[tokio::test]
    async fn seen_token_does_not_duplicate() {
        let tracker = tracker();
        let today = date("2024-06-01");
        let seed = HabitSeed::new("Drink water", Some(date("2024-06-02")), Some("sid_a".into()));

        assert!(matches!(tracker.seed(&seed, today).await, SeedOutcome::Inserted(_)));
        assert_eq!(tracker.seed(&seed, today).await, SeedOutcome::Duplicate);
        assert_eq!(tracker.list().await.len(), 1);

        let fresh = HabitSeed::new("Drink water", Some(date("2024-06-02")), Some("sid_b".into()));
        assert!(matches!(tracker.seed(&fresh, today).await, SeedOutcome::Inserted(_)));
        assert_eq!(tracker.list().await.len(), 2);
    }

    #[tokio::test]
    async fn untokened_seeds_dedupe_on_text_and_due() {
        let tracker = tracker();
        let today = date("2024-06-01");
        let seed = HabitSeed::new("  Walk  ", None, None);

        let SeedOutcome::Inserted(Saved { saved, record: habit }) = tracker.seed(&seed, today).await
        else {
            panic!("expected insert");
        };
        assert!(saved);
        assert_eq!(habit.text, "Walk");
        assert_eq!(habit.due, date("2024-06-02"));
        assert_eq!(habit.source_id, None);

        assert_eq!(tracker.seed(&seed, today).await, SeedOutcome::Duplicate);
    }

    #[tokio::test]
    async fn blank_seed_is_ignored() {
        let tracker = tracker();
        let seed = HabitSeed::new(" ", None, Some("sid_x".into()));
        assert_eq!(tracker.seed(&seed, date("2024-06-01")).await, SeedOutcome::Ignored);
        assert!(tracker.list().await.is_empty());
    }

    #[tokio::test]
    async fn add_defaults_due_and_rejects_blank() {
        let tracker = tracker();
        let today = date("2024-06-01");
        assert!(tracker.add("   ", None, today).await.is_none());

        let habit = tracker.add("Stretch", None, today).await.expect("added");
        assert!(habit.saved);
        assert_eq!(habit.record.due, date("2024-06-04"));
    }

    #[tokio::test]
    async fn newest_first_and_upcoming_sorted_by_due() {
        let tracker = tracker();
        let today = date("2024-06-01");
        tracker.add("late", Some(date("2024-06-20")), today).await;
        tracker.add("soon", Some(date("2024-06-03")), today).await;
        tracker.add("mid", Some(date("2024-06-10")), today).await;

        let stored: Vec<_> = tracker.list().await.into_iter().map(|h| h.text).collect();
        assert_eq!(stored, vec!["mid", "soon", "late"]);

        let upcoming: Vec<_> = tracker.upcoming().await.into_iter().map(|h| h.text).collect();
        assert_eq!(upcoming, vec!["soon", "mid", "late"]);
    }

    #[tokio::test]
    async fn toggle_done_flips_today_only() {
        let tracker = tracker();
        let today = date("2024-06-01");
        let habit = tracker.add("Read", None, today).await.expect("added").record;

        let done = tracker.toggle_done(&habit.id, today).await.expect("toggle");
        assert!(done.saved);
        assert!(done.record.is_done_on(today));

        let tomorrow = date("2024-06-02");
        let done = tracker.toggle_done(&habit.id, tomorrow).await.expect("toggle");
        assert_eq!(done.record.done_dates, vec![tomorrow, today]);

        let undone = tracker.toggle_done(&habit.id, today).await.expect("toggle");
        assert_eq!(undone.record.done_dates, vec![tomorrow]);

        assert!(tracker.toggle_done("missing", today).await.is_err());
    }

    #[tokio::test]
    async fn remove_deletes_by_id() {
        let tracker = tracker();
        let today = date("2024-06-01");
        let habit = tracker.add("Read", None, today).await.expect("added").record;

        assert!(tracker.remove(&habit.id).await.expect("remove"));
        assert!(tracker.list().await.is_empty());
        assert!(tracker.remove(&habit.id).await.is_err());
    }

    #[tokio::test]
    async fn list_is_capped() {
        let tracker = HabitTracker::new(Arc::new(MemoryStorage::new()), 2, HabitDefaults::default());
        let today = date("2024-06-01");
        for text in ["a", "b", "c"] {
            tracker.add(text, None, today).await;
        }
        let stored: Vec<_> = tracker.list().await.into_iter().map(|h| h.text).collect();
        assert_eq!(stored, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn unavailable_storage_reports_not_saved() {
        let tracker = HabitTracker::new(
            Arc::new(MemoryStorage::unavailable()),
            200,
            HabitDefaults::default(),
        );
        let today = date("2024-06-01");

        let added = tracker.add("Stretch", None, today).await.expect("non-blank");
        assert!(!added.saved);

        let seed = HabitSeed::new("Walk", None, Some("sid_a".into()));
        let SeedOutcome::Inserted(seeded) = tracker.seed(&seed, today).await else {
            panic!("expected insert");
        };
        assert!(!seeded.saved);
        assert!(tracker.list().await.is_empty());
    }

    #[tokio::test]
    async fn huge_due_offset_does_not_panic() {
        let defaults = HabitDefaults {
            manual_due_days: i64::MAX / 1000,
            seed_due_days: 1,
        };
        let tracker = HabitTracker::new(Arc::new(MemoryStorage::new()), 200, defaults);

        let added = tracker.add("Someday", None, date("2024-06-01")).await.expect("added");
        assert_eq!(added.record.due, NaiveDate::MAX);
    }
}
