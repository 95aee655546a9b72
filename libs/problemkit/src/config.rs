//! Layered configuration for problem dispatching.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. environment variables prefixed with `PROBLEMKIT__`, nested keys split on `__`
//!    (e.g. `PROBLEMKIT__LOGGING__LEVEL=debug`)

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use problemkit_envelope::DEFAULT_TYPE_BASE_URI;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PROBLEMKIT__";

/// Configuration error for loading [`ProblemsConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProblemsConfig {
    /// Base of every problem `type` URI.
    pub type_base_uri: String,
    /// Log unclassified failures at `error` level before answering with a
    /// system error.
    pub log_unclassified: bool,
    pub logging: LoggingConfig,
}

impl Default for ProblemsConfig {
    fn default() -> Self {
        Self {
            type_base_uri: DEFAULT_TYPE_BASE_URI.to_owned(),
            log_unclassified: true,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

impl ProblemsConfig {
    /// The layered provider stack without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, then `path` (if given), then environment overrides.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingFile`] if `path` is given but is not a
    /// file, and [`ConfigError::Invalid`] if a source has unknown keys or
    /// values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path
            && !path.is_file()
        {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let config: Self = Self::figment(path).extract()?;
        tracing::debug!(
            type_base_uri = %config.type_base_uri,
            log_unclassified = config.log_unclassified,
            "problem configuration loaded"
        );
        Ok(config)
    }
}
