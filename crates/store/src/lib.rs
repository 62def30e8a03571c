//! Persistent key-value memory for games.
//!
//! Each key names one game's (or feature's) record: a flat JSON object.
//! Reads never fail: a missing key, an unparseable payload, or an unreadable
//! backend all come back as an empty record. Writes report real I/O failures
//! through [`StoreError`].
//!
//! # Module Structure
//!
//! - [`storage`]: the raw string-per-key backend trait plus file and
//!   in-memory implementations
//! - [`memory`]: [`MemoryStore`] with get/set/update/delete/clear_all and the
//!   typed and high-score helpers
//! - [`provider`]: [`StoreProvider`], the lazily constructed process handle
//!
//! # Example
//!
//! ```
//! use arctui_store::{record, MemoryStorage, MemoryStore};
//!
//! let store = MemoryStore::new(MemoryStorage::new());
//! store.set("snake", record! { "a" => 1, "b" => 3 }).unwrap();
//! store.update("snake", record! { "a" => 2 }).unwrap();
//! assert_eq!(store.get("snake"), record! { "a" => 2, "b" => 3 });
//! assert!(store.get("tetris").is_empty());
//! ```

pub mod error;
pub mod memory;
pub mod provider;
pub mod storage;

pub use error::{Result, StoreError};
pub use memory::{MemoryStore, Record, HIGH_SCORE_FIELD};
pub use provider::StoreProvider;
pub use storage::{FileStorage, MemoryStorage, Storage};

#[doc(hidden)]
pub use serde_json;

/// Namespace used for records written by the host.
pub const DEFAULT_NAMESPACE: &str = "arctui";

/// Build a [`Record`] from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so anything it accepts works.
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $( record.insert(::std::string::String::from($key), $crate::serde_json::json!($value)); )+
        record
    }};
}
