//! Error types for uadetect.

use thiserror::Error;

use crate::rules::RuleCategory;

/// Error type for uadetect operations.
///
/// Every variant except [`Error::NotInitialized`] and
/// [`Error::FingerprintCollision`] is a configuration error: it is raised
/// while loading rules or options, never for an unparseable user agent.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading a rule file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error in a rule or configuration file
    #[error("YAML parsing error in {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A rule pattern failed to compile
    #[error("invalid pattern in {category} rules: {pattern}: {source}")]
    InvalidRegex {
        category: RuleCategory,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Device rule references a brand missing from the brand table
    #[error("unknown device brand in {1} rules: {0}")]
    UnknownBrand(String, RuleCategory),

    /// Device rule references an unknown device type
    #[error("unknown device type in {1} rules: {0}")]
    UnknownDeviceType(String, RuleCategory),

    /// OS rule with a literal name missing from the OS table
    #[error("unknown operating system: {0}")]
    UnknownOperatingSystem(String),

    /// Browser rule with a literal name missing from the browser table
    #[error("unknown browser: {0}")]
    UnknownBrowser(String),

    /// Unknown version truncation option
    #[error("invalid version truncation: {0}")]
    InvalidVersionTruncation(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Global classifier not initialized
    #[error("classifier not initialized")]
    NotInitialized,

    /// Two distinct user agents mapped onto the same cache entry
    #[error("fingerprint collision between {cached:?} and {requested:?}")]
    FingerprintCollision { cached: String, requested: String },

    /// Shared cache store failure on an explicit cache operation
    #[error(transparent)]
    CacheStore(#[from] StoreError),
}

/// Result type alias for uadetect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for shared cache store operations.
///
/// These never reach callers of `classify`: the cache logs them and falls
/// back to direct computation. Only explicit maintenance calls such as a
/// flush report them, wrapped in [`Error::CacheStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    /// A stored entry could not be decoded
    #[error("corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}
