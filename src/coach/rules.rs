//! Daily best-move heuristic as a ranked rule list.
//!
//! Rules are evaluated top to bottom and the first match wins, so the order
//! of `DAILY_RULES` is the tie-break policy. When nothing matches the
//! `FALLBACK` template is used.

use serde::{Deserialize, Serialize};

use crate::models::DailyPulse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationKind {
    StressReset,
    EnergyRecovery,
    FocusSprint,
    MoodLift,
    MaintainMomentum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    /// The "best move".
    pub primary_action: String,
    pub micro_steps: (String, String),
    pub rationale: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub kind: RecommendationKind,
    pub applies: fn(&DailyPulse) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

fn low_calm(p: &DailyPulse) -> bool {
    p.calm.value() <= 2
}

fn low_energy(p: &DailyPulse) -> bool {
    p.energy.value() <= 2
}

fn ready_to_build(p: &DailyPulse) -> bool {
    p.focus.value() >= 4 && p.energy.value() >= 3 && p.calm.value() >= 3
}

fn low_mood(p: &DailyPulse) -> bool {
    p.mood.value() <= 2
}

pub const DAILY_RULES: &[Rule] = &[
    Rule {
        kind: RecommendationKind::StressReset,
        applies: low_calm,
    },
    Rule {
        kind: RecommendationKind::EnergyRecovery,
        applies: low_energy,
    },
    Rule {
        kind: RecommendationKind::FocusSprint,
        applies: ready_to_build,
    },
    Rule {
        kind: RecommendationKind::MoodLift,
        applies: low_mood,
    },
];

pub const FALLBACK: RecommendationKind = RecommendationKind::MaintainMomentum;

/// Which template a pulse selects.
pub fn classify(pulse: &DailyPulse) -> RecommendationKind {
    DAILY_RULES
        .iter()
        .find(|rule| (rule.applies)(pulse))
        .map_or(FALLBACK, |rule| rule.kind)
}

pub fn recommend(pulse: &DailyPulse) -> Recommendation {
    classify(pulse).render(pulse)
}

impl RecommendationKind {
    /// Fill this kind's fixed template with the pulse's ratings.
    pub fn render(self, p: &DailyPulse) -> Recommendation {
        let (title, action, steps, rationale, tags): (&str, &str, [&str; 2], String, &[&str]) =
            match self {
                RecommendationKind::StressReset => (
                    "Reset and lower load",
                    "Lower stress load: do one 10-minute reset.",
                    ["2 min breathing (box breathing)", "8 min walk or stretch"],
                    format!(
                        "Calm is {}/5 (low). Priority is recovery, not productivity.",
                        p.calm
                    ),
                    &["recovery", "stress"][..],
                ),
                RecommendationKind::EnergyRecovery => (
                    "Recover energy",
                    "Recover energy: protect your next 3 hours.",
                    [
                        "Drink water + daylight 3 min",
                        "Pick one task only (15 min start)",
                    ],
                    format!(
                        "Energy is {}/5. Keep it gentle and reduce friction.",
                        p.energy
                    ),
                    &["recovery", "energy"][..],
                ),
                RecommendationKind::FocusSprint => (
                    "Deep work sprint",
                    "Use momentum: one focused 25-minute sprint.",
                    [
                        "Write the next tiny step (30 sec)",
                        "25 min deep work (timer)",
                    ],
                    format!(
                        "Focus {}/5 and calm {}/5 look good: this is a build day.",
                        p.focus, p.calm
                    ),
                    &["focus", "execution"][..],
                ),
                RecommendationKind::MoodLift => (
                    "Lift mood gently",
                    "Lift mood: do a small positive connection.",
                    [
                        "Send 1 message to someone",
                        "5 min music + tidy one surface",
                    ],
                    format!(
                        "Mood is {}/5. Small wins + connection help most.",
                        p.mood
                    ),
                    &["mood", "connection"][..],
                ),
                RecommendationKind::MaintainMomentum => (
                    "Maintain momentum",
                    "Keep it simple: one small action that moves you forward.",
                    ["Pick 1 habit for today (2 min)", "Do 10 minutes of it now"],
                    format!(
                        "Baseline looks OK. Energy {}/5, calm {}/5, focus {}/5.",
                        p.energy, p.calm, p.focus
                    ),
                    &["consistency"][..],
                ),
            };

        Recommendation {
            kind: self,
            title: title.to_string(),
            primary_action: action.to_string(),
            micro_steps: (steps[0].to_string(), steps[1].to_string()),
            rationale,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}
