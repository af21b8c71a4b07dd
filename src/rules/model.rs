//! Serde models of the YAML rule files.
//!
//! These mirror the files one to one; [`RuleStore`](super::RuleStore)
//! validates and compiles them.

use indexmap::IndexMap;
use serde::Deserialize;

/// Entry of `bots.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub producer: Option<ProducerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProducerEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Entry of `oss.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Version sub-rules tried in order when the entry matches
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub regex: String,
    #[serde(default)]
    pub version: String,
}

/// Entry of the non-browser client files.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Entry of `client/browsers.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserEntry {
    pub regex: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub engine: Option<EngineRef>,
}

/// Engine declared by a browser entry.
///
/// `versions` maps minimum browser versions to the engine used from that
/// version on, e.g. `{"28": "Blink"}` on top of a `WebKit` default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineRef {
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub versions: IndexMap<String, String>,
}

/// Entry of `client/browser_engine.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineEntry {
    pub regex: String,
    pub name: String,
}

/// Device tables: brand name to entry, in file order.
pub type DeviceBrandMap = IndexMap<String, DeviceBrandEntry>;

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceBrandEntry {
    pub regex: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub regex: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// `vendorfragments.yml`: brand name to fragment patterns.
pub type VendorFragmentMap = IndexMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_map_keeps_file_order() {
        let yaml = r#"
Zeta:
  regex: 'Zeta'
  device: 'smartphone'
Alpha:
  regex: 'Alpha'
  models:
    - regex: 'Alpha ([0-9]+)'
      model: 'A$1'
      device: 'tablet'
"#;
        let map: DeviceBrandMap = serde_yaml::from_str(yaml).unwrap();
        let brands: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(brands, vec!["Zeta", "Alpha"]);
        assert_eq!(map["Alpha"].models[0].device.as_deref(), Some("tablet"));
        assert!(map["Zeta"].models.is_empty());
    }

    #[test]
    fn test_browser_engine_versions() {
        let yaml = r#"
- regex: 'Chrome/(\d+[\.\d]+)'
  name: 'Chrome'
  version: '$1'
  engine:
    default: 'WebKit'
    versions:
      '28': 'Blink'
"#;
        let entries: Vec<BrowserEntry> = serde_yaml::from_str(yaml).unwrap();
        let engine = entries[0].engine.as_ref().unwrap();
        assert_eq!(engine.default.as_deref(), Some("WebKit"));
        assert_eq!(engine.versions.get("28").map(String::as_str), Some("Blink"));
    }

    #[test]
    fn test_bot_producer_optional() {
        let yaml = "- regex: 'Crawler'\n  name: 'Generic Bot'\n";
        let entries: Vec<BotEntry> = serde_yaml::from_str(yaml).unwrap();
        assert!(entries[0].producer.is_none());
        assert!(entries[0].category.is_none());
    }
}
