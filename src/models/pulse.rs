//! Daily check-in data models.
//!
//! `DailyPulse` is the v2 shape stored under `pf_pulses_v2`; calm is "good"
//! when higher. `LegacyPulse` is the v1 shape where the third axis was
//! stress and higher meant worse.

use std::fmt;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const RATING_DEFAULT: u8 = 3;

/// A 1..=5 self-reported score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(anyhow!(
                "rating {value} is out of range ({RATING_MIN}-{RATING_MAX})"
            ));
        }
        Ok(Self(value))
    }

    /// Clamp any integer into range; used when repairing legacy records.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(RATING_MIN as i64, RATING_MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very low",
            2 => "Low",
            3 => "Medium",
            4 => "High",
            _ => "Very high",
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(RATING_DEFAULT)
    }
}

impl TryFrom<u8> for Rating {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPulse {
    pub date: NaiveDate,
    pub energy: Rating,
    /// 1 = high stress, 5 = calm
    pub calm: Rating,
    pub mood: Rating,
    pub focus: Rating,
}

impl DailyPulse {
    /// Neutral draft for a day with no check-in yet.
    pub fn neutral(date: NaiveDate) -> Self {
        Self {
            date,
            energy: Rating::default(),
            calm: Rating::default(),
            mood: Rating::default(),
            focus: Rating::default(),
        }
    }
}

/// v1 record under `pf_pulses`. Fields were written by hand-edited forms and
/// may be missing or non-numeric, so they are kept loose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPulse {
    pub date: NaiveDate,
    #[serde(default)]
    pub energy: Option<serde_json::Value>,
    #[serde(default)]
    pub stress: Option<serde_json::Value>,
    #[serde(default)]
    pub mood: Option<serde_json::Value>,
    #[serde(default)]
    pub focus: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).expect("valid").value(), 5);
    }

    #[test]
    fn rating_deserialization_is_validated() {
        let ok: DailyPulse = serde_json::from_str(
            r#"{"date":"2024-05-01","energy":1,"calm":5,"mood":3,"focus":2}"#,
        )
        .expect("valid pulse");
        assert_eq!(ok.calm.value(), 5);

        let bad = serde_json::from_str::<DailyPulse>(
            r#"{"date":"2024-05-01","energy":9,"calm":5,"mood":3,"focus":2}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn labels_follow_scale() {
        assert_eq!(Rating::clamped(-4).label(), "Very low");
        assert_eq!(Rating::clamped(3).label(), "Medium");
        assert_eq!(Rating::clamped(42).label(), "Very high");
    }
}
