//! Classification pipeline.
//!
//! A [`Detector`] runs the stages over one user agent in a fixed order:
//!
//! 1. bot rules, which short-circuit everything else
//! 2. operating system rules
//! 3. the client chain (feed readers, mobile apps, media players, PIM,
//!    browsers, libraries)
//! 4. the device chain, then vendor fragments and the Apple brand fallback
//! 5. device type overrides derived from the OS, client and UA markers
//!
//! The mobile/desktop predicates and the device class are derived once
//! from the final state.

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::options::ClassifyOptions;
use crate::parser::{bot, client, device, os, vendor, DeviceMatch};
use crate::result::{ClassificationResult, ClientInfo, DeviceInfo, OsInfo};
use crate::rules::extract::{compare_versions, version_at_least};
use crate::rules::{tables, Pattern, RuleSource, RuleStore};
use crate::types::{ClientFamily, DeviceClass, DeviceType};

use std::cmp::Ordering;

/// UA markers consulted by the overrides.
struct Markers {
    chrome: Pattern,
    chrome_mobile: Pattern,
    android_tablet: Pattern,
    android_mobile: Pattern,
    opera_tablet: Pattern,
    opera_tv_store: Pattern,
    touch: Pattern,
}

static MARKERS: Lazy<Markers> = Lazy::new(|| {
    let compile = |source: &str| Pattern::heuristic(source).expect("marker patterns are valid");
    Markers {
        chrome: compile(r"Chrome/[\.0-9]*"),
        chrome_mobile: compile(r"Chrome/[\.0-9]* (?:Mobile|eliboM)"),
        android_tablet: compile(r"Android( [\.0-9]+)?; Tablet;"),
        android_mobile: compile(r"Android( [\.0-9]+)?; Mobile;"),
        opera_tablet: compile(r"Opera Tablet"),
        opera_tv_store: compile(r"Opera TV Store"),
        touch: compile(r"Touch"),
    }
});

/// Clients that only ship on TV hardware.
const TV_CLIENTS: &[&str] = &["Kylo", "Espial TV Browser"];

/// Rule-driven user agent classifier.
///
/// Holds one immutable [`RuleStore`]; classification is a pure function of
/// the store, the user agent and the options.
#[derive(Debug)]
pub struct Detector {
    rules: RuleStore,
}

impl Detector {
    pub fn new(rules: RuleStore) -> Self {
        Self { rules }
    }

    /// Load rules from `source` and build a detector over them.
    pub fn load(source: &RuleSource) -> Result<Self> {
        Ok(Self::new(RuleStore::load(source)?))
    }

    /// Build a detector over the embedded rules.
    pub fn embedded() -> Result<Self> {
        Self::load(&RuleSource::Embedded)
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Classify one user agent.
    ///
    /// User agents without any ASCII letter are not parsed and yield an
    /// all-unknown result.
    pub fn classify(&self, ua: &str, options: &ClassifyOptions) -> ClassificationResult {
        if !ua.bytes().any(|b| b.is_ascii_alphabetic()) {
            return ClassificationResult::unknown(ua);
        }

        if !options.skip_bot_detection {
            if let Some(found) = bot::detect(&self.rules, ua, options.discard_bot_details) {
                return ClassificationResult {
                    user_agent: ua.to_string(),
                    is_bot: true,
                    bot: found.info,
                    class: DeviceClass::Bot,
                    ..ClassificationResult::default()
                };
            }
        }

        let truncation = options.version_truncation;
        let os = os::detect(&self.rules, ua, truncation);
        let client = client::detect(&self.rules, ua, truncation);
        let mut found = device::detect(&self.rules, ua).unwrap_or_default();

        if found.brand.is_none() {
            found.brand = vendor::detect(&self.rules, ua);
        }
        if found.brand.is_none() {
            let apple_os = os
                .as_ref()
                .is_some_and(|os| tables::APPLE_OPERATING_SYSTEMS.contains(&os.name.as_str()));
            if apple_os {
                found.brand = Some("Apple".to_string());
            }
        }

        let touch_enabled = MARKERS.touch.is_match(ua);
        let desktop = is_desktop(os.as_ref(), client.as_ref());
        found.device_type = apply_overrides(
            ua,
            found.device_type,
            os.as_ref(),
            client.as_ref(),
            touch_enabled,
            desktop,
        );

        let mobile = is_mobile(found.device_type, os.as_ref(), client.as_ref(), desktop);
        let class = if mobile {
            DeviceClass::Mobile
        } else if desktop {
            DeviceClass::Desktop
        } else {
            DeviceClass::Other
        };

        ClassificationResult {
            user_agent: ua.to_string(),
            is_bot: false,
            bot: None,
            os,
            client,
            device: device_info(found),
            class,
            touch_enabled,
            mobile,
            desktop,
        }
    }
}

fn device_info(found: DeviceMatch) -> DeviceInfo {
    let brand_short = found
        .brand
        .as_deref()
        .and_then(tables::brand_short)
        .map(str::to_string);
    DeviceInfo {
        device_type: found.device_type,
        brand: found.brand,
        brand_short,
        model: found.model,
    }
}

fn os_family(os: Option<&OsInfo>) -> Option<&str> {
    os.and_then(|os| os.family.as_deref())
}

fn uses_mobile_browser(client: Option<&ClientInfo>) -> bool {
    client.is_some_and(|c| c.family == ClientFamily::Browser && tables::is_mobile_only_browser(&c.short))
}

/// Desktop when a known OS of a desktop family runs a browser that is not
/// mobile-only.
pub fn is_desktop(os: Option<&OsInfo>, client: Option<&ClientInfo>) -> bool {
    if os.is_none() || uses_mobile_browser(client) {
        return false;
    }
    os_family(os).is_some_and(tables::is_desktop_os_family)
}

/// Mobile when the device type is a mobile type. TVs, smart displays and
/// consoles never are; any other device is mobile when a mobile-only
/// browser runs or a known non-desktop OS does.
pub fn is_mobile(
    device_type: Option<DeviceType>,
    os: Option<&OsInfo>,
    client: Option<&ClientInfo>,
    desktop: bool,
) -> bool {
    match device_type {
        Some(t) if t.is_mobile() => true,
        Some(t) if t.is_never_mobile() => false,
        _ => uses_mobile_browser(client) || (!desktop && os.is_some()),
    }
}

/// Settle the device type from UA markers, the OS and the client.
///
/// Every override except the feature phone correction and the Opera TV
/// Store marker only applies while the type is still undetermined.
pub fn apply_overrides(
    ua: &str,
    mut device_type: Option<DeviceType>,
    os: Option<&OsInfo>,
    client: Option<&ClientInfo>,
    touch_enabled: bool,
    desktop: bool,
) -> Option<DeviceType> {
    let markers = &*MARKERS;
    let os_name = os.map(|os| os.name.as_str());
    let os_version = os.and_then(|os| os.version.as_deref());
    let android_family = os_family(os) == Some("Android");

    if device_type.is_none() && android_family && markers.chrome.is_match(ua) {
        if markers.chrome_mobile.is_match(ua) {
            device_type = Some(DeviceType::Smartphone);
        } else if chrome_without_mobile(ua) {
            device_type = Some(DeviceType::Tablet);
        }
    }

    if device_type.is_none()
        && (markers.android_tablet.is_match(ua) || markers.opera_tablet.is_match(ua))
    {
        device_type = Some(DeviceType::Tablet);
    }

    if device_type.is_none() && markers.android_mobile.is_match(ua) {
        device_type = Some(DeviceType::Smartphone);
    }

    if device_type.is_none() && os_name == Some("Android") {
        if let Some(version) = os_version {
            if compare_versions(version, "2.0") == Some(Ordering::Less) {
                device_type = Some(DeviceType::Smartphone);
            } else if version_at_least(version, "3.0")
                && compare_versions(version, "4.0") == Some(Ordering::Less)
            {
                device_type = Some(DeviceType::Tablet);
            }
        }
    }

    if device_type == Some(DeviceType::FeaturePhone) && android_family {
        device_type = Some(DeviceType::Smartphone);
    }

    if device_type.is_none() && touch_enabled {
        let windows_tablet = match os_name {
            Some("Windows RT") => true,
            Some("Windows") => os_version.is_some_and(|v| version_at_least(v, "8")),
            _ => false,
        };
        if windows_tablet {
            device_type = Some(DeviceType::Tablet);
        }
    }

    if markers.opera_tv_store.is_match(ua) {
        device_type = Some(DeviceType::Tv);
    }

    if device_type.is_none() && client.is_some_and(|c| TV_CLIENTS.contains(&c.name.as_str())) {
        device_type = Some(DeviceType::Tv);
    }

    if device_type.is_none() && desktop {
        device_type = Some(DeviceType::Desktop);
    }

    device_type
}

/// Whether some `Chrome/<version>` token is followed by a space and then
/// anything but `Mobile`.
fn chrome_without_mobile(ua: &str) -> bool {
    MARKERS.chrome.match_ends(ua).any(|end| {
        let rest = &ua[end..];
        match rest.strip_prefix(' ') {
            Some(after) => !after
                .get(..6)
                .is_some_and(|word| word.eq_ignore_ascii_case("mobile")),
            None => false,
        }
    })
}
