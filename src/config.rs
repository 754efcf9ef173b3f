use crate::audio::AnalysisConfig;
use crate::midi::MidiConfig;
use crate::recommend::{ClassifierConfig, GenerativeConfig};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Configuration for every command
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub common: CommonConfig,
    pub analysis: AnalysisConfig,
    pub generative: GenerativeConfig,
    pub classifier: ClassifierConfig,
    pub midi: MidiConfig,
}

/// Common configuration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    /// File analyzed when none is given on the command line
    pub input_file: PathBuf,
}

impl Default for CommonConfig {
    fn default() -> Self {
        CommonConfig {
            input_file: PathBuf::from("stroll.wav"),
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Parses configuration from TOML text, missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Load configuration from `path`
///
/// A missing file yields the default configuration. A file that exists but
/// cannot be read or parsed is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Config::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
