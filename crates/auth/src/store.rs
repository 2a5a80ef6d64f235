//! Durable storage for the bearer credential.
//!
//! The portal persists exactly one value: the credential, under
//! [`CREDENTIAL_KEY`]. Readers never cache it; every identity question goes
//! back to the store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Well-known key of the credential entry.
pub const CREDENTIAL_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("refusing to store an empty credential")]
    EmptyCredential,

    #[error("credential store io failed at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential store at {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Process-wide key-value slot holding the credential.
///
/// One mutator (login/logout), many readers. Reads are whole-string fetches,
/// so no locking discipline beyond the implementation's own is required.
pub trait CredentialStore: Send + Sync + core::fmt::Debug {
    /// Current credential, if any. Read failures are reported as absence.
    fn load(&self) -> Option<String>;

    /// Replace the stored credential.
    fn save(&self, credential: &str) -> Result<(), StoreError>;

    /// Remove the stored credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credential.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    fn save(&self, credential: &str) -> Result<(), StoreError> {
        if credential.is_empty() {
            return Err(StoreError::EmptyCredential);
        }
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

/// JSON-file store: `{ "token": "<credential>" }`.
///
/// Outlives the process, so a session survives restarts until an explicit
/// logout. Other keys in the file are preserved on write.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{app_data_dir}/campus/storage.json`, falling back to
    /// `~/.local/share` when the platform has no data dir.
    pub fn default_path() -> Option<PathBuf> {
        let mut dir = dirs::data_dir().or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })?;
        dir.push("campus");
        dir.push("storage.json");
        Some(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let payload = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename so readers never observe a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(CREDENTIAL_KEY),
            Err(err) => {
                tracing::warn!("credential store unreadable, treating as signed out: {err}");
                None
            }
        }
    }

    fn save(&self, credential: &str) -> Result<(), StoreError> {
        if credential.is_empty() {
            return Err(StoreError::EmptyCredential);
        }
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        entries.insert(CREDENTIAL_KEY.to_string(), credential.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.read_entries() {
            Ok(mut entries) => {
                if entries.remove(CREDENTIAL_KEY).is_none() {
                    return Ok(());
                }
                self.write_entries(&entries)
            }
            Err(StoreError::Corrupt { .. }) => self.write_entries(&BTreeMap::new()),
            Err(err) => Err(err),
        }
    }
}
