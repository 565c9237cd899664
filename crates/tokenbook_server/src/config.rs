//! Server configuration.
//!
//! # Responsibility
//! - Load configuration from an optional TOML file.
//! - Apply `TOKENBOOK_*` environment overrides on top of file values.
//!
//! # Invariants
//! - Every field has a usable default; an absent file is not an error.
//! - Environment values are validated at load time, not at first use.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const ENV_LISTEN_ADDR: &str = "TOKENBOOK_LISTEN_ADDR";
const ENV_STORE_PATH: &str = "TOKENBOOK_STORE_PATH";
const ENV_LOG_DIR: &str = "TOKENBOOK_LOG_DIR";
const ENV_LOG_LEVEL: &str = "TOKENBOOK_LOG_LEVEL";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load error.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        key: String,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, message } => {
                write!(f, "invalid value for `{key}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP surface listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Path of the directory document.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Directory for rolling log files. Relative paths are resolved against
    /// the working directory at startup.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log level (`trace|debug|info|warn|error`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            store_path: default_store_path(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from an optional TOML file, then applies
    /// environment overrides from the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(std::env::vars())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            source: err,
        })?;
        toml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Applies `TOKENBOOK_*` overrides from the given variable set.
    ///
    /// Takes the variables as an iterator so tests can inject values
    /// without mutating process state.
    pub fn apply_overrides(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> ConfigResult<()> {
        for (key, value) in vars {
            match key.as_str() {
                ENV_LISTEN_ADDR => {
                    self.listen_addr =
                        value.parse().map_err(|err| ConfigError::InvalidValue {
                            key,
                            message: format!("{err}"),
                        })?;
                }
                ENV_STORE_PATH => self.store_path = PathBuf::from(value),
                ENV_LOG_DIR => self.log_dir = PathBuf::from(value),
                ENV_LOG_LEVEL => self.log_level = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `log_dir` made absolute against the current working directory.
    pub fn absolute_log_dir(&self) -> std::io::Result<PathBuf> {
        if self.log_dir.is_absolute() {
            return Ok(self.log_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.log_dir))
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8545))
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/contacts.json")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    tokenbook_core::default_log_level().to_string()
}
