//! Device detection through the chain of device brand tables.

use once_cell::sync::Lazy;

use crate::rules::extract::build_model;
use crate::rules::{DeviceFamily, DeviceRule, Pattern, RuleList, RuleStore};
use crate::types::DeviceType;

static HBBTV: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(r"HbbTV/([1-9]{1}(?:\.[0-9]{1}){1,2})").expect("hbbtv pattern is valid")
});

static FACEBOOK_DEVICE: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"FBMD/").expect("fbmd pattern is valid"));

/// Device attributes produced by a brand table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceMatch {
    pub device_type: Option<DeviceType>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// Run the device chain over `ua`.
///
/// Families are tried in [`DeviceFamily::ALL`] order and the chain stops at
/// the first family whose table produced a match.
pub fn detect(rules: &RuleStore, ua: &str) -> Option<DeviceMatch> {
    for family in DeviceFamily::ALL {
        let Some(table) = rules.devices(family) else {
            continue;
        };

        let found = match family {
            DeviceFamily::HbbTv => {
                if !HBBTV.is_match(ua) {
                    continue;
                }
                // A connected TV stays a TV even when no brand matches.
                let mut found = match_brand_table(table, ua).unwrap_or_default();
                found.device_type = Some(DeviceType::Tv);
                Some(found)
            }
            DeviceFamily::Notebook => {
                if !FACEBOOK_DEVICE.is_match(ua) {
                    continue;
                }
                match_brand_table(table, ua)
            }
            _ => {
                if let Some(prefilter) = rules.device_prefilter(family) {
                    if !prefilter.is_match(ua) {
                        continue;
                    }
                }
                match_brand_table(table, ua)
            }
        };

        if let Some(found) = found {
            log::debug!("Device matched by {:?} table: {:?}", family, found);
            return Some(found);
        }
    }
    None
}

/// Match `ua` against one brand table.
///
/// The first matching brand entry wins. When it has model sub-rules, the
/// first matching sub-rule sets the model and may override the device type
/// and brand; the brand is reported even if no sub-rule matches.
pub fn match_brand_table(table: &RuleList<DeviceRule>, ua: &str) -> Option<DeviceMatch> {
    let (rule, caps) = table.first_match(ua)?;

    let mut found = DeviceMatch {
        device_type: rule.device_type,
        brand: rule.brand.clone(),
        model: None,
    };

    if rule.models.is_empty() {
        found.model = rule
            .model
            .as_deref()
            .and_then(|template| build_model(template, &caps));
        return Some(found);
    }

    let sub = rule
        .models
        .iter()
        .find_map(|m| m.pattern.captures(ua).map(|caps| (m, caps)));
    if let Some((model_rule, model_caps)) = sub {
        found.model = model_rule
            .model
            .as_deref()
            .and_then(|template| build_model(template, &model_caps));
        if model_rule.device_type.is_some() {
            found.device_type = model_rule.device_type;
        }
        if model_rule.brand.is_some() {
            found.brand = model_rule.brand.clone();
        }
    }
    Some(found)
}
