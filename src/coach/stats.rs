use crate::models::{DailyPulse, WeeklySummary};

/// Pulses considered "recent" for averages.
pub const RECENT_WINDOW: usize = 7;

fn average(values: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = values.fold((0u32, 0u32), |(sum, count), value| {
        (sum + u32::from(value), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

/// Averages over the first `RECENT_WINDOW` pulses (most recent first).
/// An empty window averages to zero.
pub fn summarize(pulses: &[DailyPulse]) -> WeeklySummary {
    let window = &pulses[..pulses.len().min(RECENT_WINDOW)];

    WeeklySummary {
        avg_energy: average(window.iter().map(|p| p.energy.value())),
        avg_calm: average(window.iter().map(|p| p.calm.value())),
        avg_mood: average(window.iter().map(|p| p.mood.value())),
        avg_focus: average(window.iter().map(|p| p.focus.value())),
        count_days: window.len(),
    }
}
