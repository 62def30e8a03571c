//! Raw storage backends.
//!
//! A backend stores one opaque string per key, like browser `localStorage`.
//! Parsing and merging live in [`crate::memory`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// String-per-key durable medium.
///
/// Methods take `&self`; backends use interior mutability where they need
/// it. All calls are synchronous.
pub trait Storage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> io::Result<()>;
    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> io::Result<()>;
    /// Remove every item owned by this backend.
    fn clear(&self) -> io::Result<()>;
}

/// In-process storage.
///
/// Clones share the same map, so a store rebuilt over a clone sees earlier
/// writes (this is what makes [`crate::StoreProvider::reset`] observable in
/// tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw payload, bypassing serialization.
    pub fn insert_raw(&self, key: &str, payload: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

const RECORD_EXT: &str = "json";

/// One `<key>.json` file per record under `<root>/<namespace>/`.
///
/// Keys are encoded into file names (`[A-Za-z0-9_-]` kept, every other byte
/// written as `%XX`), so any key string is safe.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            dir: root.as_ref().join(namespace),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), RECORD_EXT))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a half-written record.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn clear(&self) -> io::Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        for entry in entries {
            let path = entry?.path();
            // Match on the full name: the empty key is stored as the
            // dotfile `.json`, which has no extension as far as `Path` knows.
            let is_record = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&format!(".{RECORD_EXT}")));
            if is_record {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
