//! Operating system detection.

use once_cell::sync::Lazy;

use crate::options::VersionTruncation;
use crate::result::OsInfo;
use crate::rules::extract::{build_by_match, build_version};
use crate::rules::{tables, Pattern, RuleStore};
use crate::types::UNKNOWN;

/// CPU architecture markers, tried in order.
static PLATFORMS: Lazy<Vec<(&'static str, Pattern)>> = Lazy::new(|| {
    [
        ("ARM", r"arm|aarch64|Watch ?OS|Watch1,[12]"),
        ("MIPS", r"mips"),
        ("SuperH", r"sh4"),
        ("x64", r"WOW64|x64|win64|amd64|x86_?64"),
        ("x86", r"(?:i[0-9]|x)86|i86pc"),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        (
            name,
            Pattern::new(pattern).expect("platform patterns are valid"),
        )
    })
    .collect()
});

/// Detect the operating system of `ua`.
pub fn detect(rules: &RuleStore, ua: &str, truncation: VersionTruncation) -> Option<OsInfo> {
    let (rule, caps) = rules.operating_systems().first_match(ua)?;

    let raw_name = build_by_match(&rule.name, &caps);
    if raw_name.is_empty() {
        return None;
    }
    let (short, name) = match tables::os_by_name(&raw_name) {
        Some((short, canonical)) => (short.to_string(), canonical.to_string()),
        None => (UNKNOWN.to_string(), raw_name),
    };

    // A matching version sub-rule decides the version, even when empty.
    let version = rule
        .versions
        .iter()
        .find_map(|(pattern, template)| {
            pattern
                .captures(ua)
                .map(|sub| build_version(template, &sub, truncation))
        })
        .unwrap_or_else(|| {
            rule.version
                .as_deref()
                .and_then(|template| build_version(template, &caps, truncation))
        });

    let family = tables::os_family(&short).map(str::to_string);

    Some(OsInfo {
        name,
        short,
        version,
        platform: platform(ua).map(str::to_string),
        family,
    })
}

/// CPU architecture family advertised by `ua`, if any.
pub fn platform(ua: &str) -> Option<&'static str> {
    PLATFORMS
        .iter()
        .find(|(_, pattern)| pattern.is_match(ua))
        .map(|(name, _)| *name)
}
