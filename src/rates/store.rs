//! Durable client-side state for the currency engine
//!
//! A single JSON record `{ userCurrency, exchangeRates, lastUpdated }`,
//! restored at startup before any refresh so a cold start renders converted
//! values from the last-known table immediately. Persistence is an explicit
//! `save()` call at well-defined points (after a successful refresh, on
//! selection change, pre-teardown), never an implicit side effect.

use crate::error::{CurrencyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The persisted record, camelCase on disk for compatibility with the
/// dashboard's previous local-storage layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// The user's display-currency selection (`"USD - US Dollar"`)
    pub user_currency: String,
    /// Last-known rate table against the storage currency
    pub exchange_rates: HashMap<String, f64>,
    /// Epoch milliseconds of the last successful fetch, if any
    pub last_updated: Option<i64>,
}

/// File-backed store for [`PersistedState`]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store at an explicit path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Default store location under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            CurrencyError::StoreError("Could not determine platform data directory".to_string())
        })?;
        Ok(data_dir.join("stockpile").join("currency-storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record.
    ///
    /// A missing file is a normal cold start (`Ok(None)`). An unreadable or
    /// corrupt file is also `Ok(None)` with a warning: bad local state must
    /// never prevent the engine from starting.
    pub fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                log::warn!(
                    "Discarding corrupt currency state at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    /// Write the record, creating parent directories as needed
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
