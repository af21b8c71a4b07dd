//! Browser detection: name, version, rendering engine and engine version.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::options::VersionTruncation;
use crate::result::ClientInfo;
use crate::rules::extract::{build_by_match, build_version, truncate_version, version_at_least};
use crate::rules::{tables, ClientRule, EngineSpec, RuleList, RuleStore};
use crate::types::{ClientFamily, UNKNOWN};

/// Gecko reports its real version in the `rv:` token; `Gecko/` carries a
/// build date on desktop.
static GECKO_RV: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"[ ](?:rv[: ]([0-9\.]+)).*gecko/[0-9]{8,10}")
        .case_insensitive(true)
        .build()
        .expect("gecko version pattern is valid")
});

/// Match `ua` against the browser rules.
pub fn detect(
    rules: &RuleStore,
    browsers: &RuleList<ClientRule>,
    ua: &str,
    truncation: VersionTruncation,
) -> Option<ClientInfo> {
    let (rule, caps) = browsers.first_match(ua)?;

    let raw_name = build_by_match(&rule.name, &caps);
    if raw_name.is_empty() {
        return None;
    }
    let (short, name) = match tables::browser_by_name(&raw_name) {
        Some((short, canonical)) => (short, canonical.to_string()),
        None => {
            log::warn!("Browser {:?} is missing from the browser table", raw_name);
            (UNKNOWN, raw_name)
        }
    };

    let template = rule.version.as_deref().unwrap_or("");
    let version = build_version(template, &caps, truncation);
    // Engine thresholds compare against the full version.
    let full_version = build_version(template, &caps, VersionTruncation::None);

    let engine = select_engine(rules, rule.engine.as_ref(), full_version.as_deref(), ua);
    let engine_version = engine
        .as_deref()
        .and_then(|engine| engine_version(rules, engine, ua, truncation));

    Some(ClientInfo {
        family: ClientFamily::Browser,
        name,
        short: short.to_string(),
        version,
        engine,
        engine_version,
        browser_family: tables::browser_family(short).map(str::to_string),
    })
}

/// Pick the rendering engine for a browser match.
///
/// The rule's default engine is replaced by the last version threshold the
/// browser version reaches; without a declared engine the engine rule list
/// decides.
pub fn select_engine(
    rules: &RuleStore,
    spec: Option<&EngineSpec>,
    browser_version: Option<&str>,
    ua: &str,
) -> Option<String> {
    let mut engine = spec.and_then(|s| s.default.clone());
    if let (Some(spec), Some(version)) = (spec, browser_version) {
        for (min_version, candidate) in &spec.versions {
            if version_at_least(version, min_version) {
                engine = Some(candidate.clone());
            }
        }
    }

    engine.or_else(|| {
        rules
            .engines()
            .first_match(ua)
            .map(|(rule, _)| rule.name.clone())
    })
}

/// Extract the version of `engine` from `ua`.
pub fn engine_version(
    rules: &RuleStore,
    engine: &str,
    ua: &str,
    truncation: VersionTruncation,
) -> Option<String> {
    let finish = |raw: &str| {
        let version = truncate_version(raw, truncation);
        let version = version.trim_matches(|c| c == ' ' || c == '.');
        (!version.is_empty()).then(|| version.to_string())
    };

    if engine == "Gecko" {
        if let Some(version) = GECKO_RV.captures(ua).and_then(|c| c.get(1)) {
            return finish(version.as_str());
        }
    }

    let pattern = rules.engine_version_pattern(engine)?;
    for caps in pattern.captures_iter(ua) {
        let Some(version) = caps.get(1) else { continue };
        // A bare number is only a version when it is not cut out of a
        // longer digit run such as a build date.
        let truncated_run = !version.as_str().contains('.')
            && ua[version.end()..].starts_with(|c: char| c.is_ascii_digit());
        if !truncated_run {
            return finish(version.as_str());
        }
    }
    None
}
