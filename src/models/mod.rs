pub mod decision;
pub mod habit;
pub mod pulse;
pub mod weekly;

pub use decision::{Decision, DecisionDraft, DecisionGuidance, DecisionGuidanceInput};
pub use habit::{Habit, HabitSeed};
pub use pulse::{DailyPulse, LegacyPulse, Rating};
pub use weekly::{WeeklyPlan, WeeklySummary};
