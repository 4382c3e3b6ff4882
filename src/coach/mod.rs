pub mod guidance;
pub mod rules;
pub mod stats;
pub mod weekly;

use serde::{Deserialize, Serialize};

use crate::models::{DailyPulse, WeeklySummary};

pub use guidance::guide;
pub use rules::{recommend, Recommendation, RecommendationKind, DAILY_RULES};
pub use stats::summarize;
pub use weekly::{propose_habits, suggest_weekly_best_move};

/// A daily recommendation together with the recent averages shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub recommendation: Recommendation,
    /// Informational only; rule selection looks at `current` alone.
    pub recent: WeeklySummary,
}

/// Recommend for `current`, averaging it with the most recent other days.
pub fn suggest(current: &DailyPulse, history: &[DailyPulse]) -> Suggestion {
    let window: Vec<DailyPulse> = std::iter::once(current.clone())
        .chain(
            history
                .iter()
                .filter(|p| p.date != current.date)
                .take(stats::RECENT_WINDOW - 1)
                .cloned(),
        )
        .collect();

    Suggestion {
        recommendation: recommend(current),
        recent: summarize(&window),
    }
}
