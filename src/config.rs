//! Service configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. [`Config::default`]
//! 2. a TOML file (requires the `config-file` feature)
//! 3. environment variables:
//!    `FRANKENTICKET_KEY`, `FRANKENTICKET_CIPHER`, `FRANKENTICKET_BIND`,
//!    `FRANKENTICKET_PORT`
//!
//! ```toml
//! key = "700e262e085f16db8e970db29a6143a2"
//! cipher = "aes"
//! username = "John Doe"
//! default_privs = ["read"]
//! max_info_depth = 64
//! bind_addr = "127.0.0.1"
//! port = 8080
//! ```

use crate::cipher::{AES_KEY_SIZE, CipherKey, CipherKind};
use crate::ticket::{DEFAULT_MAX_DEPTH, DEFAULT_PRIVS, DEFAULT_USERNAME};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hex key used when none is configured.
///
/// It is public and only fit for demonstrations.
pub const DEFAULT_KEY_HEX: &str = "700e262e085f16db8e970db29a6143a2";

/// Environment variable holding the hex key.
pub const ENV_KEY: &str = "FRANKENTICKET_KEY";
/// Environment variable selecting the cipher.
pub const ENV_CIPHER: &str = "FRANKENTICKET_CIPHER";
/// Environment variable holding the bind address.
pub const ENV_BIND: &str = "FRANKENTICKET_BIND";
/// Environment variable holding the port.
pub const ENV_PORT: &str = "FRANKENTICKET_PORT";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for [`Config`].
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// An environment variable has an unusable value.
    #[error("invalid value for {var}: {message}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// What was wrong.
        message: String,
    },
    /// The merged configuration is inconsistent.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Everything a [`TicketService`](crate::TicketService) and its transports need.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Hex-encoded cipher key.
    #[serde(rename = "key")]
    pub key_hex: String,
    /// Ticket cipher.
    pub cipher: CipherKind,
    /// Username stamped on issued tickets.
    pub username: String,
    /// Privileges granted to issued tickets.
    pub default_privs: Vec<String>,
    /// Nesting limit for `info` data.
    pub max_info_depth: usize,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Port the HTTP server binds to; `0` picks a free port.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_hex: DEFAULT_KEY_HEX.to_string(),
            cipher: CipherKind::default(),
            username: DEFAULT_USERNAME.to_string(),
            default_privs: DEFAULT_PRIVS.iter().map(|p| (*p).to_string()).collect(),
            max_info_depth: DEFAULT_MAX_DEPTH,
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Parses a TOML document over the defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// `bind_addr:port`.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = CipherKey::from_hex(&self.key_hex)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.cipher == CipherKind::Aes128Ecb && key.len() != AES_KEY_SIZE {
            return Err(ConfigError::Validation(format!(
                "{} needs a {AES_KEY_SIZE}-byte key, configured key has {} bytes",
                self.cipher,
                key.len()
            )));
        }
        if self.max_info_depth == 0 {
            return Err(ConfigError::Validation(
                "max_info_depth must be at least 1".to_string(),
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Validation("bind_addr is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &"<redacted>")
            .field("cipher", &self.cipher)
            .field("username", &self.username)
            .field("default_privs", &self.default_privs)
            .field("max_info_depth", &self.max_info_depth)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
    Disabled,
}

/// Builds a [`Config`] from defaults, an optional file and the environment.
///
/// # Example
///
/// ```
/// use frankenticket::{CipherKind, ConfigLoader};
///
/// let config = ConfigLoader::new()
///     .with_env_vars([("FRANKENTICKET_CIPHER", "aes"), ("FRANKENTICKET_PORT", "9000")])
///     .load()
///     .unwrap();
/// assert_eq!(config.cipher, CipherKind::Aes128Ecb);
/// assert_eq!(config.port, 9000);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: EnvSource,
}

impl ConfigLoader {
    /// Loader reading the process environment and no file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            env: EnvSource::Process,
        }
    }

    /// Adds a TOML file layer.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = EnvSource::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Skips the environment layer.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.env = EnvSource::Disabled;
        self
    }

    /// Merges all layers and validates the result.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.file {
            Some(path) => load_file(path)?,
            None => Config::default(),
        };
        self.apply_env(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.env {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
            EnvSource::Disabled => None,
        }
    }

    fn apply_env(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(key) = self.var(ENV_KEY) {
            config.key_hex = key;
        }
        if let Some(cipher) = self.var(ENV_CIPHER) {
            config.cipher = cipher.parse().map_err(|e: crate::cipher::CipherError| {
                ConfigError::Env {
                    var: ENV_CIPHER,
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(bind) = self.var(ENV_BIND) {
            config.bind_addr = bind;
        }
        if let Some(port) = self.var(ENV_PORT) {
            config.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Env {
                    var: ENV_PORT,
                    message: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "config-file")]
fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Config::from_toml(&content)
}

#[cfg(not(feature = "config-file"))]
fn load_file(path: &Path) -> Result<Config, ConfigError> {
    Err(ConfigError::Validation(format!(
        "cannot load {}: TOML support requires the `config-file` feature",
        path.display()
    )))
}
