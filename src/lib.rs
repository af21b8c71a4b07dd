//! uadetect - A rule-driven user-agent classification engine.
//!
//! This crate turns a raw `User-Agent` header into a structured
//! description of the requesting software and hardware: bot identity, the
//! operating system, the client application and the device. A result cache
//! keyed by a SHA-256 fingerprint of the user agent makes repeated lookups
//! cheap.
//!
//! # Features
//!
//! - **Bot detection**: Known crawlers short-circuit classification
//! - **OS, client and device parsing**: Ordered YAML rule tables, first match wins
//! - **Device class**: Mobile, desktop, bot or other, with heuristic corrections
//! - **Two-tier cache**: Per-process map plus an optional shared store
//! - **Hot reload**: Swap rule data without restarting
//! - **Thread-safe**: All operations are thread-safe
//!
//! # Quick Start
//!
//! ```ignore
//! use uadetect::{classify, init_default, DeviceClass};
//!
//! init_default()?;
//!
//! let result = classify("Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36")?;
//! assert_eq!(result.class, DeviceClass::Mobile);
//! assert_eq!(result.os_name(), "Android");
//! assert_eq!(result.client_name(), "Chrome Mobile");
//! ```
//!
//! # Standalone classifiers
//!
//! The global API wraps a single [`Classifier`]. Applications that need
//! several independently configured instances, or a shared cache tier
//! backed by an external store, can build their own:
//!
//! ```ignore
//! use std::sync::Arc;
//! use uadetect::{Classifier, DetectorConfig, MemoryStore, SharedStore};
//!
//! let store: Arc<dyn SharedStore> = Arc::new(MemoryStore::default());
//! let classifier = Classifier::with_shared_store(&DetectorConfig::default(), store)?;
//! let result = classifier.classify("curl/8.4.0")?;
//! ```
//!
//! # Classification order
//!
//! 1. User agents without any ASCII letter are unknown
//! 2. Bots (unless bot detection is skipped)
//! 3. Operating system, client and device rules
//! 4. Vendor fragments and Apple OS fallback for the brand
//! 5. Heuristic device type corrections
//! 6. Device class

mod error;
mod global;
mod options;
mod result;
mod types;

pub mod cache;
pub mod classifier;
pub mod detector;
pub mod parser;
pub mod rules;

// Re-export core types
pub use error::{Error, Result, StoreError};
pub use options::{ClassifyOptions, VersionTruncation};
pub use result::{BotInfo, BotProducer, ClassificationResult, ClientInfo, DeviceInfo, OsInfo};
pub use types::{ClientFamily, DeviceClass, DeviceType, UNKNOWN};

// Re-export rule and detector types
pub use detector::Detector;
pub use rules::{RuleCategory, RuleSource, RuleStore};

// Re-export cache and classifier types
pub use cache::{CacheStats, Fingerprint, FingerprintCache, MemoryStore, SharedStore, Ttl};
pub use classifier::{CacheConfig, Classifier, DetectorConfig};

// Re-export global API functions
pub use global::{
    cache_stats, classify, classify_request, classify_with, flush_cache, init, init_default,
    is_initialized, reload_rules, shutdown, MISSING_USER_AGENT,
};
