//! One-shot record migrations between storage keys.
//!
//! A migration moves a JSON array of records from a legacy key to a new key,
//! detecting each shape by a marker field on the first element. Once the new
//! key holds data carrying the new marker it is never migrated or written
//! again; records that no longer decode are repaired or skipped on read.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    log_info, log_warn,
    models::{DailyPulse, LegacyPulse, Rating},
    storage::{self, Storage, PULSES_KEY, PULSES_LEGACY_KEY},
};

const ENABLE_LOGS: bool = true;

pub trait RecordMigration {
    type Target: Serialize + DeserializeOwned + Send;

    const SOURCE_KEY: &'static str;
    const TARGET_KEY: &'static str;
    /// Field present on records in the legacy shape.
    const SOURCE_MARKER: &'static str;
    /// Field present on records in the current shape.
    const TARGET_MARKER: &'static str;

    /// Convert one legacy record. Must be pure.
    fn transform(&self, legacy: Value) -> Result<Self::Target>;

    /// Decode one record already in the current shape.
    fn decode(&self, current: Value) -> Result<Self::Target> {
        Ok(serde_json::from_value(current)?)
    }
}

fn first_has_marker(value: &Value, marker: &str) -> bool {
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .map_or(false, |record| record.contains_key(marker))
}

/// Return the current-shape records, migrating them from the legacy key first
/// if the new key holds no current-shape data yet.
pub async fn migrate<M>(storage: &dyn Storage, migration: &M) -> Vec<M::Target>
where
    M: RecordMigration,
{
    let current: Value = storage::load(storage, M::TARGET_KEY, Value::Null).await;
    if first_has_marker(&current, M::TARGET_MARKER) {
        return decode_current::<M>(current, migration);
    }

    let legacy: Value = storage::load(storage, M::SOURCE_KEY, Value::Null).await;
    if !first_has_marker(&legacy, M::SOURCE_MARKER) {
        return Vec::new();
    }

    let items = match legacy {
        Value::Array(items) => items,
        _ => return Vec::new(),
    };
    let total = items.len();

    let mut migrated = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match migration.transform(item) {
            Ok(record) => migrated.push(record),
            Err(err) => log_warn!("dropping legacy record #{index}: {err:#}"),
        }
    }

    if storage::save(storage, M::TARGET_KEY, &migrated).await {
        log_info!(
            "migrated {}/{} records from '{}' to '{}'",
            migrated.len(),
            total,
            M::SOURCE_KEY,
            M::TARGET_KEY
        );
    }

    migrated
}

fn decode_current<M: RecordMigration>(current: Value, migration: &M) -> Vec<M::Target> {
    let Value::Array(items) = current else {
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match migration.decode(item) {
            Ok(record) => Some(record),
            Err(err) => {
                log_warn!(
                    "skipping unreadable record #{index} under '{}': {err:#}",
                    M::TARGET_KEY
                );
                None
            }
        })
        .collect()
}

/// v1 `stress` (higher = worse) to v2 `calm` (higher = better).
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseStressToCalm;

fn numeric(value: Option<&Value>) -> Option<i64> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n.round() as i64)
}

impl RecordMigration for PulseStressToCalm {
    type Target = DailyPulse;

    const SOURCE_KEY: &'static str = PULSES_LEGACY_KEY;
    const TARGET_KEY: &'static str = PULSES_KEY;
    const SOURCE_MARKER: &'static str = "stress";
    const TARGET_MARKER: &'static str = "calm";

    fn transform(&self, legacy: Value) -> Result<DailyPulse> {
        let old: LegacyPulse =
            serde_json::from_value(legacy).context("legacy pulse is missing a valid date")?;
        let default = i64::from(Rating::default().value());

        Ok(DailyPulse {
            date: old.date,
            energy: Rating::clamped(numeric(old.energy.as_ref()).unwrap_or(default)),
            calm: Rating::clamped(
                numeric(old.stress.as_ref()).map_or(default, |stress| 6 - stress),
            ),
            mood: Rating::clamped(numeric(old.mood.as_ref()).unwrap_or(default)),
            focus: Rating::clamped(numeric(old.focus.as_ref()).unwrap_or(default)),
        })
    }

    /// Out-of-range or missing ratings are clamped; only the date is required.
    fn decode(&self, current: Value) -> Result<DailyPulse> {
        if let Ok(pulse) = DailyPulse::deserialize(&current) {
            return Ok(pulse);
        }

        let date = current.get("date").context("stored pulse has no date")?;
        let date = NaiveDate::deserialize(date).context("stored pulse date is invalid")?;
        let default = i64::from(Rating::default().value());
        let rating = |field: &str| Rating::clamped(numeric(current.get(field)).unwrap_or(default));

        log_warn!("repairing out-of-range ratings in stored pulse for {date}");
        Ok(DailyPulse {
            date,
            energy: rating("energy"),
            calm: rating("calm"),
            mood: rating("mood"),
            focus: rating("focus"),
        })
    }
}
