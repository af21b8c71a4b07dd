//! Classifier configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::options::ClassifyOptions;
use crate::rules::RuleSource;

/// Cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether results are memoized at all
    pub enabled: bool,
    /// Capacity of a bundled in-memory shared tier; 0 disables the tier
    pub shared_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shared_capacity: 0,
        }
    }
}

impl CacheConfig {
    /// Configuration with caching disabled.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            shared_capacity: 0,
        }
    }
}

/// Configuration of a [`Classifier`](super::Classifier).
///
/// ```yaml
/// rules_dir: /etc/uadetect/rules
/// options:
///   version_truncation: major_minor
///   discard_bot_details: false
///   skip_bot_detection: false
/// cache:
///   enabled: true
///   shared_capacity: 50000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Directory laid out like the bundled `data/`; embedded rules if unset
    pub rules_dir: Option<PathBuf>,
    /// Options used when a call does not pass its own
    pub options: ClassifyOptions,
    pub cache: CacheConfig,
}

impl DetectorConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<inline>")
    }

    /// Read and parse a YAML configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(yaml: &str, file: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::Yaml {
            file: file.to_string(),
            source: e,
        })
    }

    /// Where the rules come from.
    pub fn rule_source(&self) -> RuleSource {
        match &self.rules_dir {
            Some(dir) => RuleSource::Directory(dir.clone()),
            None => RuleSource::Embedded,
        }
    }
}
