//! Key-value persistence port.
//!
//! Every collection is one JSON value under one string key. Reads never fail
//! from the caller's point of view: anything that goes wrong yields the
//! caller's fallback. Writes report success as a bool and log on failure.

use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{log_error, log_warn};

pub mod migration;

const ENABLE_LOGS: bool = true;

pub const PULSES_LEGACY_KEY: &str = "pf_pulses";
pub const PULSES_KEY: &str = "pf_pulses_v2";
pub const DECISIONS_KEY: &str = "pf_decisions";
pub const WEEKLY_KEY: &str = "pf_weekly_v2";
pub const HABITS_KEY: &str = "pf_habits_v2";

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    /// All keys currently stored, in ascending order.
    async fn list(&self) -> Result<Vec<String>>;
}

/// Read and decode `key`, returning `fallback` when the store is unavailable,
/// the key is absent, or the stored JSON does not match `T`.
pub async fn load<T>(storage: &dyn Storage, key: &str, fallback: T) -> T
where
    T: DeserializeOwned,
{
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(err) => {
            log_warn!("storage read for '{key}' failed, using fallback: {err:#}");
            return fallback;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            log_warn!("stored value for '{key}' is unparsable, using fallback: {err}");
            fallback
        }
    }
}

/// Encode and write `value` under `key`. Returns whether it was persisted.
pub async fn save<T>(storage: &dyn Storage, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
{
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(err) => {
            log_error!("failed to encode value for '{key}': {err}");
            return false;
        }
    };

    match storage.set(key, &encoded).await {
        Ok(()) => true,
        Err(err) => {
            log_error!("storage write for '{key}' failed: {err:#}");
            false
        }
    }
}

/// A record handed back by a write, flagged with whether it reached storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Saved<T> {
    pub saved: bool,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Saved<T> {
    pub fn new(record: T, saved: bool) -> Self {
        Self { saved, record }
    }
}

/// Caller-generated unique token, e.g. `sid_4f1c…`.
pub fn new_token(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

/// In-process store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation errors, like storage disabled by the host.
    pub fn unavailable() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            unavailable: true,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        if self.unavailable {
            bail!("storage is unavailable");
        }
        Ok(match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        if self.unavailable {
            bail!("storage is unavailable");
        }
        Ok(match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}
