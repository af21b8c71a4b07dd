//! Classification options.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// How many version components are kept in extracted versions.
///
/// Truncation keeps the major component plus the given number of minor
/// components, so `MajorMinor` turns `"10.0.19041"` into `"10.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionTruncation {
    /// Keep versions as matched
    #[default]
    None,
    /// Keep `major` only
    Major,
    /// Keep `major.minor`
    MajorMinor,
    /// Keep `major.minor.patch`
    Patch,
    /// Keep `major.minor.patch.build`
    Build,
}

impl VersionTruncation {
    /// Number of minor components kept after the major one.
    ///
    /// Returns `None` when versions are not truncated.
    pub fn max_minor_parts(&self) -> Option<usize> {
        match self {
            VersionTruncation::None => None,
            VersionTruncation::Major => Some(0),
            VersionTruncation::MajorMinor => Some(1),
            VersionTruncation::Patch => Some(2),
            VersionTruncation::Build => Some(3),
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionTruncation::None => "none",
            VersionTruncation::Major => "major",
            VersionTruncation::MajorMinor => "major_minor",
            VersionTruncation::Patch => "patch",
            VersionTruncation::Build => "build",
        }
    }
}

impl fmt::Display for VersionTruncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VersionTruncation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(VersionTruncation::None),
            "major" => Ok(VersionTruncation::Major),
            "major_minor" | "minor" => Ok(VersionTruncation::MajorMinor),
            "patch" => Ok(VersionTruncation::Patch),
            "build" => Ok(VersionTruncation::Build),
            _ => Err(Error::InvalidVersionTruncation(s.to_string())),
        }
    }
}

/// Options applied to a single classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyOptions {
    /// Granularity of extracted OS and client versions
    pub version_truncation: VersionTruncation,
    /// Report bots as a bare flag without name/category/producer
    pub discard_bot_details: bool,
    /// Never short-circuit as bot; classify crawlers like any other client
    pub skip_bot_detection: bool,
}

impl ClassifyOptions {
    /// Create options with the given version truncation.
    pub fn with_truncation(version_truncation: VersionTruncation) -> Self {
        Self {
            version_truncation,
            ..Self::default()
        }
    }

    /// Short tag identifying this option set, used to namespace cache keys.
    pub fn tag(&self) -> String {
        format!(
            "{}:{}:{}",
            self.version_truncation.as_str(),
            u8::from(self.discard_bot_details),
            u8::from(self.skip_bot_detection)
        )
    }
}
