//! Auth presence
//!
//! The core never validates or decodes the credential: a non-empty token
//! under the well-known key means "authenticated".

use crate::error::StorageError;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Well-known storage key of the auth token
pub const DEFAULT_TOKEN_KEY: &str = "vle_token";

/// Read-only access to the persisted credential marker
pub trait AuthProvider: Send + Sync {
    /// Current token, if any
    fn token(&self) -> Option<String>;

    /// Whether a usable token is present
    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|token| !token.is_empty())
    }
}

/// Token held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Authenticated with `token`
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// No credential
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl AuthProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// File-backed key/value store holding the auth token
///
/// The file is a flat JSON object of string values, so other keys written
/// by other tools survive a `set` or `remove`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    key: String,
}

impl TokenStore {
    /// Store at `path`, reading the token under `key`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Store at `path` using [`DEFAULT_TOKEN_KEY`]
    #[must_use]
    pub fn with_default_key(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_TOKEN_KEY)
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key the token is stored under
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the token
    ///
    /// # Errors
    /// Returns `StorageError` if the file exists but cannot be read or parsed.
    pub fn get(&self) -> Result<Option<String>, StorageError> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Persist `token` under the key
    ///
    /// # Errors
    /// Returns `StorageError` if the file cannot be read or replaced.
    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    /// Remove the token; returns whether one was present
    ///
    /// # Errors
    /// Returns `StorageError` if the file cannot be read or replaced.
    pub fn remove(&self) -> Result<bool, StorageError> {
        let mut map = self.read_map()?;
        let removed = map.remove(&self.key).is_some();
        if removed {
            self.write_map(&map)?;
        }
        Ok(removed)
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let body = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&body).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl AuthProvider for TokenStore {
    fn token(&self) -> Option<String> {
        match self.get() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "unreadable token store; treating as signed out");
                None
            }
        }
    }
}
