//! Small persistent key-value store. Values are JSON text keyed by string;
//! higher layers each own their own key namespace.

use log::{error, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Store handle shared by the favorites registry and the style cache.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Raw string storage. Implementations must never fail for a missing key and
/// must swallow (and log) their own I/O failures.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

#[derive(Debug)]
pub enum StoreError {
    /// Persisted text that no longer parses. Treated as unset.
    Malformed { key: String, source: serde_json::Error },
    Serialize { key: String, source: serde_json::Error },
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Malformed { key, source } => {
                write!(f, "malformed cached value for {key}: {source}")
            }
            StoreError::Serialize { key, source } => {
                write!(f, "could not serialize value for {key}: {source}")
            }
            StoreError::Io { path, source } => write!(f, "store io error at {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
    fn set_json<T: Serialize>(&self, key: &str, value: &T);
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                warn!("{}", StoreError::Malformed { key: key.to_owned(), source });
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(source) => error!("{}", StoreError::Serialize { key: key.to_owned(), source }),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store. Used by tests and `--no-persist`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        lock(&self.entries).insert(key.to_owned(), value);
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Durable store backed by one JSON object file. Every `set` rewrites the file.
///
/// The mutex serializes writers inside this process only. Two processes
/// sharing the file can still lose each other's updates.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; a corrupt
    /// one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|source| {
                warn!(
                    "{}",
                    StoreError::Malformed { key: path.display().to_string(), source }
                );
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                warn!("{}", StoreError::Io { path: path.clone(), source });
                BTreeMap::new()
            }
        };
        Self { path, entries: Mutex::new(entries) }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let payload = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Serialize { key: self.path.display().to_string(), source }
        })?;
        // Write beside the real file and swap it in, so a failed write never
        // leaves a truncated store behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(io)?;
        std::fs::rename(&tmp, &self.path).map_err(io)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_owned(), value);
        if let Err(e) = self.flush(&entries) {
            error!("{e}");
        }
    }
}

/// Default on-disk location: `$XDG_CONFIG_HOME/cfbtui/store.json`, then
/// `~/.config/cfbtui/store.json`, then the working directory.
pub fn default_store_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("cfbtui").join("store.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("cfbtui")
            .join("store.json");
    }
    PathBuf::from("cfbtui_store.json")
}

// A poisoned lock only means another thread panicked mid-insert; the map
// itself is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u8,
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cfbtui-store-test-{}-{name}", std::process::id()))
            .join("store.json")
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope"), None);
        assert_eq!(store.get_json::<Sample>("nope"), None);
    }

    #[test]
    fn test_malformed_value_reads_as_unset() {
        let store = MemoryStore::new();
        store.set("broken", "{not json".to_string());
        assert_eq!(store.get_json::<Sample>("broken"), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set_json("k", &Sample { a: 1 });
        store.set_json("k", &Sample { a: 2 });
        assert_eq!(store.get_json::<Sample>("k"), Some(Sample { a: 2 }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path);
        store.set_json("k", &Sample { a: 7 });
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_json::<Sample>("k"), Some(Sample { a: 7 }));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_swaps_in_new_contents() {
        let path = temp_path("swap");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path);
        store.set_json("k", &Sample { a: 1 });
        store.set_json("k", &Sample { a: 2 });

        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(FileStore::open(&path).get_json::<Sample>("k"), Some(Sample { a: 2 }));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[[[").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("anything", "1".to_string());
        assert_eq!(FileStore::open(&path).get("anything").as_deref(), Some("1"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
