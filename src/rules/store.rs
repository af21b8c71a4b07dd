//! Loading, validation and compilation of rule data.

use ahash::AHashMap;
use regex::{Regex, RegexBuilder};
use serde::de::DeserializeOwned;

use super::category::{DeviceFamily, RuleCategory, RuleSource};
use super::model::{
    BotEntry, BrowserEntry, ClientEntry, DeviceBrandMap, EngineEntry, OsEntry, VendorFragmentMap,
};
use super::pattern::Pattern;
use super::tables;
use super::{Rule, RuleList};
use crate::error::{Error, Result};
use crate::result::{BotInfo, BotProducer};
use crate::types::{ClientFamily, DeviceType};

/// Compiled bot rule.
#[derive(Debug)]
pub struct BotRule {
    pub pattern: Pattern,
    pub info: BotInfo,
}

/// Compiled operating system rule.
#[derive(Debug)]
pub struct OsRule {
    pub pattern: Pattern,
    /// Canonical name, or a `$N` template resolved at match time
    pub name: String,
    pub version: Option<String>,
    pub versions: Vec<(Pattern, String)>,
}

/// Compiled client rule. Only browser rules carry an engine.
#[derive(Debug)]
pub struct ClientRule {
    pub pattern: Pattern,
    pub name: String,
    pub version: Option<String>,
    pub engine: Option<EngineSpec>,
}

/// Engine declared by a browser rule.
#[derive(Debug, Clone, Default)]
pub struct EngineSpec {
    pub default: Option<String>,
    /// `(minimum browser version, engine)` thresholds in file order
    pub versions: Vec<(String, String)>,
}

/// Compiled rendering engine rule.
#[derive(Debug)]
pub struct EngineRule {
    pub pattern: Pattern,
    pub name: String,
}

/// Compiled device brand rule.
#[derive(Debug)]
pub struct DeviceRule {
    pub pattern: Pattern,
    /// `None` for rules filed under the `Unknown` brand
    pub brand: Option<String>,
    pub device_type: Option<DeviceType>,
    pub model: Option<String>,
    pub models: Vec<ModelRule>,
}

/// Model sub-rule of a [`DeviceRule`].
#[derive(Debug)]
pub struct ModelRule {
    pub pattern: Pattern,
    pub model: Option<String>,
    pub device_type: Option<DeviceType>,
    pub brand: Option<String>,
}

/// Vendor fragments of one brand.
#[derive(Debug)]
pub struct VendorFragment {
    pub brand: String,
    pub patterns: Vec<Pattern>,
}

macro_rules! impl_rule {
    ($($ty:ty),*) => {
        $(impl Rule for $ty {
            fn pattern(&self) -> &Pattern {
                &self.pattern
            }
        })*
    };
}

impl_rule!(BotRule, OsRule, ClientRule, EngineRule, DeviceRule, ModelRule);

/// All compiled rule data.
///
/// A store is immutable once loaded; reloading rules means building a new
/// store and swapping it in.
#[derive(Debug)]
pub struct RuleStore {
    bots: RuleList<BotRule>,
    bot_prefilter: Option<Pattern>,
    operating_systems: RuleList<OsRule>,
    clients: Vec<(ClientFamily, RuleList<ClientRule>)>,
    engines: RuleList<EngineRule>,
    engine_versions: AHashMap<String, Regex>,
    devices: Vec<(DeviceFamily, RuleList<DeviceRule>)>,
    portable_media_player_prefilter: Option<Pattern>,
    vendor_fragments: Vec<VendorFragment>,
}

impl RuleStore {
    /// Load and validate every category from `source`.
    ///
    /// Fails on the first malformed file, invalid pattern, or reference to
    /// an unknown brand, device type, operating system or browser.
    pub fn load(source: &RuleSource) -> Result<Self> {
        let bots = load_bots(source)?;
        let bot_prefilter = bots
            .combined()
            .map_err(|e| invalid_regex(RuleCategory::Bots, "<combined>", e))?;

        let operating_systems = load_operating_systems(source)?;

        let mut clients = Vec::with_capacity(ClientFamily::ALL.len());
        for family in ClientFamily::ALL {
            let rules = if family == ClientFamily::Browser {
                load_browsers(source)?
            } else {
                load_clients(source, client_category(family))?
            };
            clients.push((family, rules));
        }

        let engines = load_engines(source)?;
        let engine_versions = compile_engine_versions(&engines, &clients)?;

        let mut devices = Vec::with_capacity(DeviceFamily::ALL.len());
        for family in DeviceFamily::ALL {
            devices.push((family, load_devices(source, family.category())?));
        }
        let portable_media_player_prefilter = devices
            .iter()
            .find(|(f, _)| *f == DeviceFamily::PortableMediaPlayer)
            .map(|(_, rules)| rules.combined())
            .transpose()
            .map_err(|e| invalid_regex(RuleCategory::PortableMediaPlayers, "<combined>", e))?
            .flatten();

        let vendor_fragments = load_vendor_fragments(source)?;

        let store = Self {
            bots,
            bot_prefilter,
            operating_systems,
            clients,
            engines,
            engine_versions,
            devices,
            portable_media_player_prefilter,
            vendor_fragments,
        };
        log::info!(
            "Loaded {} rules from {}",
            store.total_rules(),
            source.describe()
        );
        Ok(store)
    }

    /// Load the rules compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Self::load(&RuleSource::Embedded)
    }

    pub fn bots(&self) -> &RuleList<BotRule> {
        &self.bots
    }

    /// Pattern matching whenever any bot rule does.
    pub fn bot_prefilter(&self) -> Option<&Pattern> {
        self.bot_prefilter.as_ref()
    }

    pub fn operating_systems(&self) -> &RuleList<OsRule> {
        &self.operating_systems
    }

    /// Rules of one client family.
    pub fn clients(&self, family: ClientFamily) -> Option<&RuleList<ClientRule>> {
        self.clients
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, rules)| rules)
    }

    pub fn engines(&self) -> &RuleList<EngineRule> {
        &self.engines
    }

    /// Version extraction pattern for a rendering engine.
    pub fn engine_version_pattern(&self, engine: &str) -> Option<&Regex> {
        self.engine_versions.get(engine)
    }

    /// Brand table of one device family.
    pub fn devices(&self, family: DeviceFamily) -> Option<&RuleList<DeviceRule>> {
        self.devices
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, rules)| rules)
    }

    /// Pre-filter guarding a device family, if it has one.
    pub fn device_prefilter(&self, family: DeviceFamily) -> Option<&Pattern> {
        match family {
            DeviceFamily::PortableMediaPlayer => self.portable_media_player_prefilter.as_ref(),
            _ => None,
        }
    }

    pub fn vendor_fragments(&self) -> &[VendorFragment] {
        &self.vendor_fragments
    }

    /// Number of top-level rules in a category.
    pub fn rule_count(&self, category: RuleCategory) -> usize {
        match category {
            RuleCategory::Bots => self.bots.len(),
            RuleCategory::OperatingSystems => self.operating_systems.len(),
            RuleCategory::BrowserEngines => self.engines.len(),
            RuleCategory::VendorFragments => self.vendor_fragments.len(),
            _ => {
                let clients = self
                    .clients
                    .iter()
                    .find(|(_, rules)| rules.category() == category)
                    .map(|(_, rules)| rules.len());
                let devices = self
                    .devices
                    .iter()
                    .find(|(_, rules)| rules.category() == category)
                    .map(|(_, rules)| rules.len());
                clients.or(devices).unwrap_or(0)
            }
        }
    }

    /// Number of top-level rules across all categories.
    pub fn total_rules(&self) -> usize {
        RuleCategory::ALL.iter().map(|c| self.rule_count(*c)).sum()
    }

    /// Patterns of a category in list order, as written in the rule file.
    pub fn patterns(&self, category: RuleCategory) -> Vec<&str> {
        fn sources<T: Rule>(rules: &RuleList<T>) -> Vec<&str> {
            rules.iter().map(|r| r.pattern().as_str()).collect()
        }
        match category {
            RuleCategory::Bots => sources(&self.bots),
            RuleCategory::OperatingSystems => sources(&self.operating_systems),
            RuleCategory::BrowserEngines => sources(&self.engines),
            RuleCategory::VendorFragments => self
                .vendor_fragments
                .iter()
                .flat_map(|v| v.patterns.iter().map(Pattern::as_str))
                .collect(),
            _ => {
                if let Some((_, rules)) = self.clients.iter().find(|(_, r)| r.category() == category)
                {
                    sources(rules)
                } else if let Some((_, rules)) =
                    self.devices.iter().find(|(_, r)| r.category() == category)
                {
                    sources(rules)
                } else {
                    Vec::new()
                }
            }
        }
    }
}

fn client_category(family: ClientFamily) -> RuleCategory {
    match family {
        ClientFamily::FeedReader => RuleCategory::FeedReaders,
        ClientFamily::MobileApp => RuleCategory::MobileApps,
        ClientFamily::MediaPlayer => RuleCategory::MediaPlayers,
        ClientFamily::Pim => RuleCategory::Pim,
        ClientFamily::Browser => RuleCategory::Browsers,
        ClientFamily::Library => RuleCategory::Libraries,
    }
}

fn parse_yaml<T: DeserializeOwned + Default>(source: &RuleSource, category: RuleCategory) -> Result<T> {
    let text = source.read(category)?;
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&text).map_err(|e| Error::Yaml {
        file: category.file_name().to_string(),
        source: e,
    })
}

fn invalid_regex(category: RuleCategory, pattern: &str, source: regex::Error) -> Error {
    Error::InvalidRegex {
        category,
        pattern: pattern.to_string(),
        source,
    }
}

fn compile(category: RuleCategory, pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| invalid_regex(category, pattern, e))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_template(value: &str) -> bool {
    value.contains('$')
}

fn device_type(value: Option<&str>, category: RuleCategory) -> Result<Option<DeviceType>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => DeviceType::parse(name)
            .map(Some)
            .ok_or_else(|| Error::UnknownDeviceType(name.to_string(), category)),
    }
}

fn brand(value: &str, category: RuleCategory) -> Result<Option<String>> {
    if value == tables::UNKNOWN_BRAND {
        return Ok(None);
    }
    tables::brand_by_name(value)
        .map(|b| Some(b.to_string()))
        .ok_or_else(|| Error::UnknownBrand(value.to_string(), category))
}

fn load_bots(source: &RuleSource) -> Result<RuleList<BotRule>> {
    let category = RuleCategory::Bots;
    let entries: Vec<BotEntry> = parse_yaml(source, category)?;
    let rules = entries
        .into_iter()
        .map(|entry| {
            Ok(BotRule {
                pattern: compile(category, &entry.regex)?,
                info: BotInfo {
                    name: entry.name,
                    category: non_empty(entry.category),
                    url: non_empty(entry.url),
                    producer: entry.producer.map(|p| BotProducer {
                        name: non_empty(p.name),
                        url: non_empty(p.url),
                    }),
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleList::new(category, rules))
}

fn load_operating_systems(source: &RuleSource) -> Result<RuleList<OsRule>> {
    let category = RuleCategory::OperatingSystems;
    let entries: Vec<OsEntry> = parse_yaml(source, category)?;
    let mut rules = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = if is_template(&entry.name) {
            entry.name
        } else {
            let (_, canonical) = tables::os_by_name(&entry.name)
                .ok_or_else(|| Error::UnknownOperatingSystem(entry.name.clone()))?;
            canonical.to_string()
        };
        let versions = entry
            .versions
            .iter()
            .map(|v| Ok((compile(category, &v.regex)?, v.version.clone())))
            .collect::<Result<Vec<_>>>()?;
        rules.push(OsRule {
            pattern: compile(category, &entry.regex)?,
            name,
            version: entry.version,
            versions,
        });
    }
    Ok(RuleList::new(category, rules))
}

fn load_clients(source: &RuleSource, category: RuleCategory) -> Result<RuleList<ClientRule>> {
    let entries: Vec<ClientEntry> = parse_yaml(source, category)?;
    let rules = entries
        .into_iter()
        .map(|entry| {
            Ok(ClientRule {
                pattern: compile(category, &entry.regex)?,
                name: entry.name,
                version: entry.version,
                engine: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleList::new(category, rules))
}

fn load_browsers(source: &RuleSource) -> Result<RuleList<ClientRule>> {
    let category = RuleCategory::Browsers;
    let entries: Vec<BrowserEntry> = parse_yaml(source, category)?;
    let mut rules = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = if is_template(&entry.name) {
            entry.name
        } else {
            let (_, canonical) = tables::browser_by_name(&entry.name)
                .ok_or_else(|| Error::UnknownBrowser(entry.name.clone()))?;
            canonical.to_string()
        };
        let engine = entry.engine.map(|e| EngineSpec {
            default: non_empty(e.default),
            versions: e.versions.into_iter().collect(),
        });
        rules.push(ClientRule {
            pattern: compile(category, &entry.regex)?,
            name,
            version: entry.version,
            engine,
        });
    }
    Ok(RuleList::new(category, rules))
}

fn load_engines(source: &RuleSource) -> Result<RuleList<EngineRule>> {
    let category = RuleCategory::BrowserEngines;
    let entries: Vec<EngineEntry> = parse_yaml(source, category)?;
    let rules = entries
        .into_iter()
        .map(|entry| {
            Ok(EngineRule {
                pattern: compile(category, &entry.regex)?,
                name: entry.name,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleList::new(category, rules))
}

/// Token searched for when extracting an engine's version.
fn engine_token(engine: &str) -> String {
    match engine {
        "Blink" => "Chr[o0]me|Chromium|Cronet".to_string(),
        "EdgeHTML" => "Edge".to_string(),
        other => regex::escape(other),
    }
}

fn compile_engine_versions(
    engines: &RuleList<EngineRule>,
    clients: &[(ClientFamily, RuleList<ClientRule>)],
) -> Result<AHashMap<String, Regex>> {
    let mut names: Vec<&str> = engines.iter().map(|e| e.name.as_str()).collect();
    for (_, rules) in clients {
        for rule in rules.iter() {
            if let Some(spec) = &rule.engine {
                names.extend(spec.default.as_deref());
                names.extend(spec.versions.iter().map(|(_, engine)| engine.as_str()));
            }
        }
    }

    let mut patterns = AHashMap::new();
    for name in names {
        if patterns.contains_key(name) {
            continue;
        }
        let source = format!(
            r"(?:{})\s*/?\s*(\d+\.\d[.\d]*|\d{{1,7}})",
            engine_token(name)
        );
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| invalid_regex(RuleCategory::BrowserEngines, &source, e))?;
        patterns.insert(name.to_string(), regex);
    }
    Ok(patterns)
}

fn load_devices(source: &RuleSource, category: RuleCategory) -> Result<RuleList<DeviceRule>> {
    let entries: DeviceBrandMap = parse_yaml(source, category)?;
    let mut rules = Vec::with_capacity(entries.len());
    for (brand_name, entry) in entries {
        let models = entry
            .models
            .into_iter()
            .map(|m| {
                Ok(ModelRule {
                    pattern: compile(category, &m.regex)?,
                    model: m.model,
                    device_type: device_type(m.device.as_deref(), category)?,
                    brand: match m.brand {
                        Some(b) => brand(&b, category)?,
                        None => None,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rules.push(DeviceRule {
            pattern: compile(category, &entry.regex)?,
            brand: brand(&brand_name, category)?,
            device_type: device_type(entry.device.as_deref(), category)?,
            model: entry.model,
            models,
        });
    }
    Ok(RuleList::new(category, rules))
}

fn load_vendor_fragments(source: &RuleSource) -> Result<Vec<VendorFragment>> {
    let category = RuleCategory::VendorFragments;
    let entries: VendorFragmentMap = parse_yaml(source, category)?;
    let mut fragments = Vec::with_capacity(entries.len());
    for (brand_name, patterns) in entries {
        let brand = brand(&brand_name, category)?
            .ok_or_else(|| Error::UnknownBrand(brand_name.clone(), category))?;
        let patterns = patterns
            .iter()
            .map(|p| compile(category, &format!("{}[^a-z0-9]+", p)))
            .collect::<Result<Vec<_>>>()?;
        fragments.push(VendorFragment { brand, patterns });
    }
    Ok(fragments)
}
