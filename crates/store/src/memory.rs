//! MemoryStore: JSON records on top of a [`Storage`] backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::storage::Storage;

/// One stored record: a flat JSON object.
pub type Record = Map<String, Value>;

/// Field of a game's record holding its best score.
pub const HIGH_SCORE_FIELD: &str = "highScore";

/// Keyed record store.
///
/// Absence and corruption are indistinguishable to callers: both read as an
/// empty record.
pub struct MemoryStore {
    storage: Box<dyn Storage>,
}

impl MemoryStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Stored record for `key`, or an empty record.
    pub fn get(&self, key: &str) -> Record {
        let payload = match self.storage.get_item(key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Record::new(),
            Err(e) => {
                log::warn!("store: read of {key:?} failed: {e}");
                return Record::new();
            }
        };
        match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Object(record)) => record,
            Ok(_) => {
                log::debug!("store: {key:?} is not a JSON object; treating as absent");
                Record::new()
            }
            Err(e) => {
                log::debug!("store: {key:?} is not valid JSON ({e}); treating as absent");
                Record::new()
            }
        }
    }

    /// Replace the record at `key`.
    pub fn set(&self, key: &str, value: Record) -> Result<()> {
        let payload = serde_json::to_string(&Value::Object(value))?;
        self.storage.set_item(key, &payload)?;
        Ok(())
    }

    /// Shallow-merge `partial` over the current record and write it back.
    pub fn update(&self, key: &str, partial: Record) -> Result<()> {
        let mut current = self.get(key);
        current.extend(partial);
        self.set(key, current)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key)?;
        Ok(())
    }

    /// Remove every record in this store's namespace.
    pub fn clear_all(&self) -> Result<()> {
        self.storage.clear()?;
        Ok(())
    }

    /// Read a record as `T`, falling back to `T::default()` when the record
    /// is absent or does not match `T`.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let record = self.get(key);
        if record.is_empty() {
            return T::default();
        }
        serde_json::from_value(Value::Object(record)).unwrap_or_else(|e| {
            log::debug!("store: {key:?} does not match the requested shape ({e})");
            T::default()
        })
    }

    /// Serialize `value` and store it at `key`. `value` must serialize to a
    /// JSON object.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let Value::Object(record) = serde_json::to_value(value)? else {
            return Err(StoreError::NotAnObject(key.to_string()));
        };
        self.set(key, record)
    }

    /// Best score recorded for `game`, 0 when unknown.
    pub fn high_score(&self, game: &str) -> u64 {
        self.get(game)
            .get(HIGH_SCORE_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Store `score` as the best for `game` if it beats the current best.
    ///
    /// Returns whether a new best was written. Other fields of the game's
    /// record are preserved.
    pub fn record_high_score(&self, game: &str, score: u64) -> Result<bool> {
        if score <= self.high_score(game) {
            return Ok(false);
        }
        let mut partial = Record::new();
        partial.insert(HIGH_SCORE_FIELD.to_string(), Value::from(score));
        self.update(game, partial)?;
        Ok(true)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}
