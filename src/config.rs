//! Runtime configuration: defaults, an optional YAML file, then environment
//! overrides (`CHARGEN_CATALOG`, `CHARGEN_TECHNIQUES`, `CHARGEN_BIND`,
//! `CHARGEN_DICE`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{DEFAULT_CATALOG_PATH, DEFAULT_TECHNIQUES_PATH};
use crate::compose::CountWeights;
use crate::render::DiceStyle;

pub const CONFIG_PATH_ENV: &str = "CHARGEN_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "chargen.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("archetype_counts must have a non-zero weight and counts of at least 1")]
    InvalidWeights,
    #[error("unknown dice style '{0}' (expected plain or glyph)")]
    DiceStyle(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub techniques_path: PathBuf,
    pub bind_addr: String,
    pub archetype_counts: CountWeights,
    pub dice_style: DiceStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            techniques_path: PathBuf::from(DEFAULT_TECHNIQUES_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            archetype_counts: CountWeights::default(),
            dice_style: DiceStyle::default(),
        }
    }
}

impl AppConfig {
    /// Config file named by `CHARGEN_CONFIG`, else `chargen.yaml` when present,
    /// else defaults; environment overrides apply last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).is_file() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup("CHARGEN_CATALOG") {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CHARGEN_TECHNIQUES") {
            self.techniques_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("CHARGEN_BIND") {
            self.bind_addr = addr;
        }
        if let Some(style) = lookup("CHARGEN_DICE") {
            self.dice_style = DiceStyle::parse(&style).ok_or(ConfigError::DiceStyle(style))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = &self.archetype_counts;
        if weights.total() == 0 || weights.0.keys().any(|count| *count == 0) {
            return Err(ConfigError::InvalidWeights);
        }
        Ok(())
    }
}
