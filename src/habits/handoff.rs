//! Cross-page habit hand-off through `/habits?seed=…&due=…&sid=…` links.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{
    models::{Habit, HabitSeed},
    utils::dates::{add_days, iso_date, parse_iso_date},
};

pub const HABITS_ROUTE: &str = "/habits";

impl HabitSeed {
    pub fn new(seed: impl Into<String>, due: Option<NaiveDate>, sid: Option<String>) -> Self {
        Self {
            seed: seed.into(),
            due: due.map(iso_date),
            sid,
        }
    }

    /// Seed text with surrounding whitespace removed; `None` when blank.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.seed.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Token, treating an empty `sid=` the same as an absent one.
    pub fn token(&self) -> Option<&str> {
        self.sid
            .as_deref()
            .map(str::trim)
            .filter(|sid| !sid.is_empty())
    }

    /// The link's due date when it is a well-formed `YYYY-MM-DD`, otherwise
    /// `today + default_days`.
    pub fn resolve_due(&self, today: NaiveDate, default_days: i64) -> NaiveDate {
        self.due
            .as_deref()
            .filter(|due| due.len() == 10)
            .and_then(|due| parse_iso_date(due).ok())
            .unwrap_or_else(|| add_days(today, default_days))
    }
}

/// Parse either a full link (`/habits?seed=…`) or a bare query string.
pub fn parse_link(link: &str) -> Result<HabitSeed> {
    let query = match link.split_once('?') {
        Some((_, query)) => query,
        None => link,
    };
    serde_qs::from_str(query).with_context(|| format!("invalid habit link '{link}'"))
}

pub fn to_link(seed: &HabitSeed) -> Result<String> {
    let query = serde_qs::to_string(seed).context("failed to encode habit link")?;
    Ok(format!("{HABITS_ROUTE}?{query}"))
}

/// Whether a seed resolving to `text`/`due` is already present.
///
/// A token, when present, is the only identity. Without one, any habit with
/// identical text and due date counts as the same, even if it came from a
/// different suggestion.
pub fn is_duplicate(existing: &[Habit], text: &str, due: NaiveDate, sid: Option<&str>) -> bool {
    match sid {
        Some(sid) => existing
            .iter()
            .any(|habit| habit.source_id.as_deref() == Some(sid)),
        None => existing
            .iter()
            .any(|habit| habit.text == text && habit.due == due),
    }
}
