use chrono::NaiveDate;
use pathfinder_lib::{
    coach::RecommendationKind,
    habits::{handoff, SeedOutcome},
    models::{DailyPulse, DecisionDraft, Rating},
    storage::{Storage, PULSES_KEY, PULSES_LEGACY_KEY},
    AppState,
};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
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

#[tokio::test]
async fn check_in_hands_off_a_habit_exactly_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::open(dir.path()).expect("open state");
    let today = date("2024-06-12");

    let outcome = state
        .today
        .save(pulse("2024-06-12", 2, 4, 3, 4), today)
        .await
        .expect("save pulse");
    assert!(outcome.saved);
    assert_eq!(
        outcome.suggestion.recommendation.kind,
        RecommendationKind::EnergyRecovery
    );

    let seed = handoff::parse_link(&outcome.habit_link).expect("parse link");
    let SeedOutcome::Inserted(inserted) = state.habits.seed(&seed, today).await else {
        panic!("first hand-off should insert");
    };
    assert!(inserted.saved);
    let habit = inserted.record;
    assert_eq!(habit.text, "Drink water + daylight 3 min");
    assert_eq!(habit.due, date("2024-06-13"));

    // Re-opening the same link (e.g. a page refresh) is a no-op.
    assert_eq!(state.habits.seed(&seed, today).await, SeedOutcome::Duplicate);
    assert_eq!(state.habits.list().await.len(), 1);

    let decision = state
        .decisions
        .submit(
            DecisionDraft {
                decision: "Take the contract".into(),
                ..DecisionDraft::default()
            },
            today,
        )
        .await
        .expect("submit decision");
    assert!(decision.saved);
    assert_eq!(state.decisions.recent(6).await, vec![decision.record]);

    let plan = state.weekly.confirm(Vec::new(), today).await;
    assert!(plan.saved);
    let plan = plan.record;
    assert_eq!(plan.week_start, date("2024-06-10"));
    assert_eq!(plan.summary.count_days, 1);

    let mut keys = state.storage.list().await.expect("list keys");
    keys.sort();
    assert_eq!(
        keys,
        vec!["pf_decisions", "pf_habits_v2", "pf_pulses_v2", "pf_weekly_v2"]
    );
}

#[tokio::test]
async fn legacy_pulses_are_migrated_once_and_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let state = AppState::open(dir.path()).expect("open state");
        state
            .storage
            .set(
                PULSES_LEGACY_KEY,
                r#"[{"date":"2024-06-11","energy":4,"stress":2,"mood":4,"focus":5}]"#,
            )
            .await
            .expect("seed legacy");

        let history = state.today.history().await;
        assert_eq!(history, vec![pulse("2024-06-11", 4, 4, 4, 5)]);
    }

    let state = AppState::open(dir.path()).expect("reopen state");
    assert!(state
        .storage
        .get(PULSES_KEY)
        .await
        .expect("get")
        .is_some());

    let view = state.today.load(date("2024-06-11")).await.expect("load");
    assert!(view.already_checked_in);
    assert_eq!(
        view.suggestion.recommendation.kind,
        RecommendationKind::FocusSprint
    );
}
