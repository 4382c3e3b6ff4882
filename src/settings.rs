use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Per-collection caps; the oldest entries are dropped on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryLimits {
    pub pulses: usize,
    pub decisions: usize,
    pub weekly_plans: usize,
    pub habits: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            pulses: 30,
            decisions: 50,
            weekly_plans: 12,
            habits: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitDefaults {
    /// Due offset for habits added by hand.
    pub manual_due_days: i64,
    /// Due offset for seeded habits whose link carries no usable date.
    pub seed_due_days: i64,
}

impl HabitDefaults {
    /// Longest due offset accepted from the settings file.
    pub const MAX_DUE_DAYS: i64 = 365;

    fn bounded(self) -> Self {
        let clamp = |days: i64| days.clamp(0, Self::MAX_DUE_DAYS);
        let bounded = Self {
            manual_due_days: clamp(self.manual_due_days),
            seed_due_days: clamp(self.seed_due_days),
        };
        if bounded != self {
            warn!(
                "Habit due offsets must be within 0-{} days, using {}/{}",
                Self::MAX_DUE_DAYS,
                bounded.manual_due_days,
                bounded.seed_due_days
            );
        }
        bounded
    }
}

impl Default for HabitDefaults {
    fn default() -> Self {
        Self {
            manual_due_days: 3,
            seed_due_days: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub limits: HistoryLimits,
    pub habits: HabitDefaults,
}

impl UserSettings {
    fn bounded(self) -> Self {
        Self {
            habits: self.habits.bounded(),
            ..self
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data: UserSettings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unparsable settings at {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data.bounded()),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn limits(&self) -> HistoryLimits {
        self.read().limits.clone()
    }

    pub fn habit_defaults(&self) -> HabitDefaults {
        self.read().habits.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the settings and write them out. Returns what was stored.
    pub fn update(&self, settings: UserSettings) -> Result<UserSettings> {
        let mut guard = self.write();
        *guard = settings.bounded();
        self.persist(&guard)?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
