use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::db::{Database, HistoryStore, JsonFileStore, MemoryStore, TwinStore, HISTORY_CAPACITY};

pub const DATA_DIR_ENV: &str = "CHILDEYE_DATA_DIR";
pub const BACKEND_ENV: &str = "CHILDEYE_BACKEND";

const SQLITE_FILE: &str = "digital_twin.sqlite3";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwinSettings {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Json
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("digital_twin")
}

fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}

impl Default for TwinSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl TwinSettings {
    /// Apply `CHILDEYE_DATA_DIR` / `CHILDEYE_BACKEND` on top of these settings.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(backend) = std::env::var(BACKEND_ENV) {
            self.backend = backend
                .parse()
                .with_context(|| format!("invalid {BACKEND_ENV}"))?;
        }
        Ok(self)
    }

    /// Bind the configured backend.
    pub fn open_store(&self) -> Result<HistoryStore> {
        let backend: Arc<dyn TwinStore> = match self.backend {
            StorageBackend::Json => Arc::new(JsonFileStore::new(self.data_dir.clone())?),
            StorageBackend::Sqlite => Arc::new(Database::new(self.data_dir.join(SQLITE_FILE))?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(HistoryStore::with_capacity(backend, self.history_capacity))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<TwinSettings>,
}

impl SettingsStore {
    /// Load from `path`. A missing or unparseable file yields defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            TwinSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, TwinSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, TwinSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn settings(&self) -> TwinSettings {
        self.read().clone()
    }

    pub fn update<F>(&self, change: F) -> Result<TwinSettings>
    where
        F: FnOnce(&mut TwinSettings),
    {
        let mut guard = self.write();
        change(&mut guard);
        self.persist(&guard)?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &TwinSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
