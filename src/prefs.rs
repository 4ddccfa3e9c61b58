//! Client-side preference storage
//!
//! The page remembers exactly one thing between visits: the table sort mode.
//! In the browser that lives in `localStorage`; the terminal front-end keeps
//! it in a small JSON file under the platform config directory.

use std::collections::HashMap;
use thiserror::Error;

/// Storage key for the persisted sort mode.
pub const SORT_MODE_KEY: &str = "dovi_sort_mode";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Preference storage unavailable: {0}")]
    Unavailable(String),

    #[error("Preference file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store, shaped after the Web Storage API.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store. Used in tests and when nothing persistent is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileStore;

#[cfg(feature = "native")]
mod file {
    use super::{PreferenceStore, StoreError};
    use directories::ProjectDirs;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    const PREFS_FILE: &str = "prefs.json";

    /// JSON object file holding all preferences.
    ///
    /// The file is read once on open and rewritten on every `set`.
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open the store at the platform default location.
        pub fn open_default() -> Result<Self, StoreError> {
            let dirs = ProjectDirs::from("", "", "dovi-shelf").ok_or_else(|| {
                StoreError::Unavailable("no home directory to place preferences in".into())
            })?;
            Self::open(dirs.config_dir().join(PREFS_FILE))
        }

        /// Open the store at `path`. A missing file is an empty store.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
            let path = path.as_ref().to_path_buf();
            let values = match fs::read_to_string(&path) {
                Ok(text) if text.trim().is_empty() => BTreeMap::new(),
                Ok(text) => serde_json::from_str(&text)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            Ok(Self { path, values })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl PreferenceStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.values.insert(key.to_string(), value.to_string());
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
            tracing::debug!(path = %self.path.display(), key, "preference written");
            Ok(())
        }
    }
}
