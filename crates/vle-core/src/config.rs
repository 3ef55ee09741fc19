//! Front-end configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables, then validated.
//!
//! ```toml
//! [api]
//! base_url = "https://learn.example.com/api"
//! timeout_secs = 15
//!
//! [auth]
//! token_key = "vle_token"
//! store_path = ".vle/storage.json"
//!
//! [notifications]
//! dwell_ms = 3000
//! exit_ms = 300
//!
//! [logging]
//! profile = "production"
//! json = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vle_client::{ApiConfig, TokenStore, DEFAULT_TOKEN_KEY};
use vle_notify::NotificationTimings;

/// Overrides `api.base_url`
pub const ENV_API_URL: &str = "VLE_API_URL";
/// Overrides `auth.store_path`
pub const ENV_TOKEN_STORE: &str = "VLE_TOKEN_STORE";
/// Overrides `logging.profile`
pub const ENV_PROFILE: &str = "VLE_PROFILE";

/// Default token store location
pub const DEFAULT_STORE_PATH: &str = ".vle/storage.json";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VleConfig {
    /// Learning API connection
    pub api: ApiConfig,
    /// Auth marker location
    pub auth: AuthConfig,
    /// Toast timings
    pub notifications: NotificationTimings,
    /// Log output
    pub logging: LoggingConfig,
}

/// Where the auth marker lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key the token is stored under
    pub token_key: String,
    /// Token store file
    pub store_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

/// Build profile deciding the default log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Everything from `info` up
    #[default]
    Development,
    /// Only warnings and errors
    Production,
}

impl Profile {
    /// Filter directive used when neither `RUST_LOG` nor `logging.filter` is set
    #[inline]
    #[must_use]
    pub fn default_filter(self) -> &'static str {
        match self {
            Self::Development => "info",
            Self::Production => "warn",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::invalid(
                "logging.profile",
                format!("unknown profile {other:?}"),
            )),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit `EnvFilter` directive
    pub filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Build profile
    pub profile: Profile,
}

impl VleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// With token store file
    #[inline]
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth.store_path = path.into();
        self
    }

    /// With toast timings
    #[inline]
    #[must_use]
    pub fn with_notifications(mut self, timings: NotificationTimings) -> Self {
        self.notifications = timings;
        self
    }

    /// With build profile
    #[inline]
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.logging.profile = profile;
        self
    }

    /// Parse a TOML document; missing keys take their defaults
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed TOML or mistyped values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from `path` (or defaults), apply the process environment and validate
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed, or a value
    /// is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        let config = config.apply_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VLE_*` overrides from `vars`
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` for an unknown profile name.
    pub fn apply_env<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                ENV_API_URL => self.api.base_url = value,
                ENV_TOKEN_STORE => self.auth.store_path = PathBuf::from(value),
                ENV_PROFILE => self.logging.profile = value.parse()?,
                _ => {}
            }
        }
        Ok(self)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                format!("{base_url:?} is not an http(s) URL"),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::invalid("api.timeout_secs", "must be positive"));
        }
        if self.auth.token_key.is_empty() {
            return Err(ConfigError::invalid("auth.token_key", "must not be empty"));
        }
        if self.notifications.dwell_ms == 0 {
            return Err(ConfigError::invalid("notifications.dwell_ms", "must be positive"));
        }
        Ok(())
    }

    /// Token store described by the `auth` section
    #[must_use]
    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.auth.store_path, &self.auth.token_key)
    }
}
