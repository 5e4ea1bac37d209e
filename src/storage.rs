//! Key/value persistence backends for the client session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store reads and writes three string slots through this seam.
//! Browsers use `localStorage`, the terminal client uses a JSON file, and tests
//! use the in-memory map.
//!
//! ERROR HANDLING
//! ==============
//! Reads that fail look like absent keys and writes are best-effort: a backend
//! logs the failure and carries on, the same way a quota-exceeded
//! `localStorage.setItem` would leave the page running.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// String key/value slots readable across page loads (or CLI invocations).
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.slots().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.slots().remove(key);
    }
}

// =============================================================================
// FILE
// =============================================================================

/// A JSON object on disk, rewritten in full on every change.
///
/// A missing or corrupt file reads as empty, so a damaged session file behaves
/// like a logged-out client rather than an error.
#[cfg(feature = "native")]
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

#[cfg(feature = "native")]
impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable; treating as empty");
            BTreeMap::new()
        })
    }

    fn store(&self, slots: &BTreeMap<String, String>) {
        if let Err(e) = self.try_store(slots) {
            tracing::warn!(path = %self.path.display(), error = %e, "session file write failed");
        }
    }

    fn try_store(&self, slots: &BTreeMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(slots).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.load();
        f(&mut slots);
        self.store(&slots);
    }
}

#[cfg(feature = "native")]
impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|slots| {
            slots.insert(key.to_owned(), value.to_owned());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|slots| {
            slots.remove(key);
        });
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `window.localStorage`. Every call re-resolves the storage handle so a page
/// without storage access simply reads as logged out.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
impl LocalStorage {
    fn handle() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "hydrate")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::handle()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::handle() else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            tracing::warn!(key, "localStorage write failed");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::handle() {
            let _ = storage.remove_item(key);
        }
    }
}
