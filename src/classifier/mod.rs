//! Classifier facade: detector, fingerprint cache and hot reload.

mod config;

pub use config::{CacheConfig, DetectorConfig};

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache::{CacheStats, FingerprintCache, MemoryStore, SharedStore};
use crate::detector::Detector;
use crate::error::Result;
use crate::options::ClassifyOptions;
use crate::result::ClassificationResult;
use crate::rules::RuleSource;

/// Thread-safe classifier with result caching and rule hot reload.
///
/// # Example
///
/// ```ignore
/// use uadetect::{Classifier, DetectorConfig};
///
/// let classifier = Classifier::new(&DetectorConfig::default())?;
/// let result = classifier.classify("Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X)")?;
/// assert_eq!(result.brand(), "Apple");
/// ```
pub struct Classifier {
    /// Swapped atomically on reload; in-flight calls finish on the old rules.
    detector: ArcSwap<Detector>,
    cache: Option<FingerprintCache>,
    options: ClassifyOptions,
    generation: AtomicU64,
}

impl Classifier {
    /// Load the configured rules and set up the cache tiers.
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let detector = Detector::load(&config.rule_source())?;
        let cache = if !config.cache.enabled {
            None
        } else if config.cache.shared_capacity > 0 {
            let store: Arc<dyn SharedStore> =
                Arc::new(MemoryStore::new(config.cache.shared_capacity));
            Some(FingerprintCache::with_shared_store(store))
        } else {
            Some(FingerprintCache::new())
        };
        Ok(Self::from_parts(detector, cache, config.options))
    }

    /// Like [`Classifier::new`], with `store` as the shared cache tier.
    pub fn with_shared_store(config: &DetectorConfig, store: Arc<dyn SharedStore>) -> Result<Self> {
        let detector = Detector::load(&config.rule_source())?;
        let cache = FingerprintCache::with_shared_store(store);
        Ok(Self::from_parts(detector, Some(cache), config.options))
    }

    /// Assemble a classifier from an existing detector and cache.
    pub fn from_parts(
        detector: Detector,
        cache: Option<FingerprintCache>,
        options: ClassifyOptions,
    ) -> Self {
        Self {
            detector: ArcSwap::from_pointee(detector),
            cache,
            options,
            generation: AtomicU64::new(0),
        }
    }

    /// Classify with the configured default options.
    pub fn classify(&self, user_agent: &str) -> Result<Arc<ClassificationResult>> {
        self.classify_with(user_agent, &self.options)
    }

    /// Classify with explicit options.
    pub fn classify_with(
        &self,
        user_agent: &str,
        options: &ClassifyOptions,
    ) -> Result<Arc<ClassificationResult>> {
        // The detector is loaded inside the computation, after the cache
        // has noted its flush epoch, so a result from replaced rules is
        // never stored.
        let compute = || self.detector.load().classify(user_agent, options);
        match &self.cache {
            Some(cache) => cache.get_or_compute(user_agent, options, compute),
            None => Ok(Arc::new(compute())),
        }
    }

    /// Replace the rules with ones loaded from `source`.
    ///
    /// The current rules stay in place if loading fails. On success both
    /// cache tiers are flushed, since cached results are never revalidated.
    pub fn reload(&self, source: &RuleSource) -> Result<()> {
        let detector = Detector::load(source)?;
        self.detector.store(Arc::new(detector));
        self.generation.fetch_add(1, Ordering::SeqCst);
        log::info!("Hot reloaded rules from {}", source.describe());
        self.flush_cache()
    }

    /// Drop all cached results.
    pub fn flush_cache(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.flush(),
            None => Ok(()),
        }
    }

    /// Cache counters, `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(FingerprintCache::stats)
    }

    /// Number of successful reloads.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// The detector currently in use.
    pub fn detector(&self) -> Arc<Detector> {
        self.detector.load_full()
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("options", &self.options)
            .field("cache", &self.cache)
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleCategory;
    use crate::types::DeviceClass;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";

    #[test]
    fn test_classify_cached() {
        let classifier = Classifier::new(&DetectorConfig::default()).unwrap();
        let first = classifier.classify(IPHONE).unwrap();
        let second = classifier.classify(IPHONE).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.brand(), "Apple");

        let stats = classifier.cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_cache_disabled() {
        let config = DetectorConfig {
            cache: CacheConfig::disabled(),
            ..DetectorConfig::default()
        };
        let classifier = Classifier::new(&config).unwrap();
        assert!(classifier.cache_stats().is_none());
        let first = classifier.classify(IPHONE).unwrap();
        let second = classifier.classify(IPHONE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_options_applied() {
        let config = DetectorConfig {
            options: ClassifyOptions {
                skip_bot_detection: true,
                ..ClassifyOptions::default()
            },
            ..DetectorConfig::default()
        };
        let classifier = Classifier::new(&config).unwrap();
        let ua = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        assert!(!classifier.classify(ua).unwrap().is_bot);
        assert!(classifier
            .classify_with(ua, &ClassifyOptions::default())
            .unwrap()
            .is_bot);
    }

    #[test]
    fn test_reload_swaps_rules_and_flushes() {
        let classifier = Classifier::new(&DetectorConfig::default()).unwrap();
        let ua = "NightCrawlerish Reader/2.0";
        assert_eq!(classifier.classify(ua).unwrap().class, DeviceClass::Bot);

        let source = RuleSource::Overlay(vec![(RuleCategory::Bots, "[]".to_string())]);
        classifier.reload(&source).unwrap();
        assert_eq!(classifier.generation(), 1);
        assert_eq!(classifier.cache_stats().unwrap().local_len, 0);
        assert!(!classifier.classify(ua).unwrap().is_bot);
    }

    #[test]
    fn test_reload_during_classification_not_cached() {
        let classifier = Classifier::new(&DetectorConfig::default()).unwrap();
        let cache = classifier.cache.as_ref().unwrap();
        let ua = "NightCrawlerish Reader/2.0";
        let options = ClassifyOptions::default();
        let source = RuleSource::Overlay(vec![(RuleCategory::Bots, "[]".to_string())]);

        // Classify on the old rules while a reload completes.
        let stale = cache
            .get_or_compute(ua, &options, || {
                let old = classifier.detector();
                classifier.reload(&source).unwrap();
                old.classify(ua, &options)
            })
            .unwrap();
        assert!(stale.is_bot);
        assert_eq!(classifier.cache_stats().unwrap().local_len, 0);
        assert!(!classifier.classify(ua).unwrap().is_bot);
    }

    #[test]
    fn test_failed_reload_keeps_rules() {
        let classifier = Classifier::new(&DetectorConfig::default()).unwrap();
        let source = RuleSource::Overlay(vec![(
            RuleCategory::Bots,
            "- regex: 'Broken('\n  name: 'Broken'\n".to_string(),
        )]);
        assert!(classifier.reload(&source).is_err());
        assert_eq!(classifier.generation(), 0);
        assert_eq!(classifier.classify(IPHONE).unwrap().os_name(), "iOS");
    }

    #[test]
    fn test_shared_store_between_classifiers() {
        let store: Arc<dyn SharedStore> = Arc::new(MemoryStore::new(128));
        let config = DetectorConfig::default();
        let first = Classifier::with_shared_store(&config, Arc::clone(&store)).unwrap();
        let second = Classifier::with_shared_store(&config, Arc::clone(&store)).unwrap();

        first.classify(IPHONE).unwrap();
        let result = second.classify(IPHONE).unwrap();
        assert_eq!(result.os_name(), "iOS");
        assert_eq!(second.cache_stats().unwrap().shared_hits, 1);
    }
}
