//! Weekly best move and habit proposals from 7-day averages.

use crate::models::WeeklySummary;

pub const MAX_PROPOSED_HABITS: usize = 3;

#[derive(Clone, Copy)]
pub struct WeeklyRule {
    pub applies: fn(&WeeklySummary) -> bool,
    pub best_move: &'static str,
}

fn strained(s: &WeeklySummary) -> bool {
    s.avg_calm <= 2.6
}

fn drained(s: &WeeklySummary) -> bool {
    s.avg_energy <= 2.6
}

fn ready_to_build(s: &WeeklySummary) -> bool {
    s.avg_focus >= 3.7 && s.avg_calm >= 3.0
}

fn low_mood(s: &WeeklySummary) -> bool {
    s.avg_mood <= 2.6
}

pub const WEEKLY_RULES: &[WeeklyRule] = &[
    WeeklyRule {
        applies: strained,
        best_move: "Reduce load: one daily 10-minute reset + protect sleep.",
    },
    WeeklyRule {
        applies: drained,
        best_move: "Recover energy: simplify commitments + daily daylight + earlier bedtime.",
    },
    WeeklyRule {
        applies: ready_to_build,
        best_move:
            "Build week: schedule 3 focused sprints (25 min) on your highest-value task.",
    },
    WeeklyRule {
        applies: low_mood,
        best_move: "Mood lift: add 2 connection moments + one fun micro-activity midweek.",
    },
];

pub const WEEKLY_FALLBACK: &str = "Consistency week: keep habits small and show up daily.";

pub fn suggest_weekly_best_move(summary: &WeeklySummary) -> &'static str {
    WEEKLY_RULES
        .iter()
        .find(|rule| (rule.applies)(summary))
        .map_or(WEEKLY_FALLBACK, |rule| rule.best_move)
}

/// One calm habit, one energy habit, then focus, mood or planning.
pub fn propose_habits(summary: &WeeklySummary) -> Vec<String> {
    let calm = if summary.avg_calm <= 3.0 {
        "10-minute reset daily (breathing + stretch/walk)"
    } else {
        "5-minute decompression after work (no phone)"
    };

    let energy = if summary.avg_energy <= 3.0 {
        "Daylight + water within 30 minutes of waking"
    } else {
        "15-minute movement (walk) after lunch"
    };

    let third = if summary.avg_focus >= 3.4 {
        "One 25-minute deep work sprint (timer)"
    } else if summary.avg_mood <= 3.0 {
        "1 small connection message daily"
    } else {
        "2-minute plan for tomorrow (evening)"
    };

    [calm, energy, third]
        .into_iter()
        .take(MAX_PROPOSED_HABITS)
        .map(str::to_string)
        .collect()
}
