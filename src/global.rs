//! Process-wide classifier and public convenience API.
//!
//! The global classifier must be set up explicitly with [`init`] before
//! use; every call made before that, or after [`shutdown`], fails with
//! [`Error::NotInitialized`]. All functions are safe to call from any
//! thread. Classification never holds the global lock while matching.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::cache::CacheStats;
use crate::classifier::{Classifier, DetectorConfig};
use crate::error::{Error, Result};
use crate::options::ClassifyOptions;
use crate::result::ClassificationResult;
use crate::rules::RuleSource;

/// User agent classified for requests that carry none.
pub const MISSING_USER_AGENT: &str = "unknown";

/// Global classifier
static GLOBAL_CLASSIFIER: Lazy<RwLock<Option<Arc<Classifier>>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the global classifier from `config`.
///
/// Replaces any previously initialized classifier. On error the previous
/// state is left untouched.
pub fn init(config: &DetectorConfig) -> Result<()> {
    let classifier = Classifier::new(config)?;
    *GLOBAL_CLASSIFIER.write() = Some(Arc::new(classifier));
    log::debug!("Initialized global classifier");
    Ok(())
}

/// Initialize the global classifier with the embedded rules.
pub fn init_default() -> Result<()> {
    init(&DetectorConfig::default())
}

/// Check if the global classifier is initialized.
pub fn is_initialized() -> bool {
    GLOBAL_CLASSIFIER.read().is_some()
}

/// Drop the global classifier and its cache.
pub fn shutdown() {
    if GLOBAL_CLASSIFIER.write().take().is_some() {
        log::debug!("Global classifier shut down");
    }
}

fn current() -> Result<Arc<Classifier>> {
    GLOBAL_CLASSIFIER
        .read()
        .as_ref()
        .map(Arc::clone)
        .ok_or(Error::NotInitialized)
}

/// Classify a user agent with the configured default options.
///
/// # Examples
/// ```ignore
/// uadetect::init_default()?;
/// let result = uadetect::classify("curl/8.4.0")?;
/// assert_eq!(result.client_name(), "curl");
/// ```
pub fn classify(user_agent: &str) -> Result<Arc<ClassificationResult>> {
    current()?.classify(user_agent)
}

/// Classify a user agent with explicit options.
pub fn classify_with(
    user_agent: &str,
    options: &ClassifyOptions,
) -> Result<Arc<ClassificationResult>> {
    current()?.classify_with(user_agent, options)
}

/// Classify the `User-Agent` header of a request, which may be absent.
pub fn classify_request(user_agent: Option<&str>) -> Result<Arc<ClassificationResult>> {
    classify(user_agent.unwrap_or(MISSING_USER_AGENT))
}

/// Hot reload the global rules and flush the cache.
pub fn reload_rules(source: &RuleSource) -> Result<()> {
    current()?.reload(source)
}

/// Flush both cache tiers of the global classifier.
///
/// Required after rule data changes outside [`reload_rules`], as cached
/// results are never revalidated.
pub fn flush_cache() -> Result<()> {
    current()?.flush_cache()
}

/// Cache counters of the global classifier.
pub fn cache_stats() -> Result<Option<CacheStats>> {
    Ok(current()?.cache_stats())
}
