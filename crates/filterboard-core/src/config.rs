//! Builder configuration.
//!
//! Layered the usual way: compiled defaults, then `filterboard.toml`, then
//! `FILTERBOARD_`-prefixed environment variables (double underscore as the
//! section separator, e.g. `FILTERBOARD_MIRROR__INDENT=4`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = "filterboard.toml";

const ENV_PREFIX: &str = "FILTERBOARD_";
const MAX_INDENT: usize = 16;

/// Configuration loading/validation error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Provider or deserialization failure.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// Mirror indent outside the accepted range.
    #[error("mirror indent {0} exceeds the maximum of {MAX_INDENT}")]
    IndentTooLarge(usize),
}

/// Shape of the serialized JSON mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorStyle {
    /// The brace-less `"filters": [ ... ]` fragment the builder textarea
    /// shows.
    #[default]
    Fragment,
    /// A bare JSON array.
    Array,
    /// A full `{"filters": [ ... ]}` object.
    Wrapped,
}

/// What to do with filter entries that fail to decode on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Drop them without a trace (the historical behavior).
    Silent,
    /// Drop them but log each at warn level with its array index.
    #[default]
    Warn,
}

/// Mirror formatting options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Output shape.
    pub style: MirrorStyle,
    /// Pretty-print indent width in spaces.
    pub indent: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            style: MirrorStyle::default(),
            indent: 2,
        }
    }
}

/// Import behavior options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Policy for entries that fail to decode.
    pub on_skipped_entry: SkipPolicy,
}

/// Top-level builder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Mirror formatting.
    pub mirror: MirrorConfig,
    /// Import behavior.
    pub import: ImportConfig,
}

impl BuilderConfig {
    /// Loads configuration from `filterboard.toml` (if present) and the
    /// environment, over the compiled defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Loads configuration from a specific TOML file plus the environment.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mirror.indent > MAX_INDENT {
            return Err(ConfigError::IndentTooLarge(self.mirror.indent));
        }
        Ok(())
    }
}
