//! Client detection across the client families.

use crate::options::VersionTruncation;
use crate::result::ClientInfo;
use crate::rules::extract::{build_by_match, build_version};
use crate::rules::RuleStore;
use crate::types::{ClientFamily, UNKNOWN};

use super::browser;

/// Detect the client of `ua`.
///
/// Families are tried in [`ClientFamily::ALL`] order and the first family
/// with a matching rule wins, so an in-app browser is reported as the app.
pub fn detect(rules: &RuleStore, ua: &str, truncation: VersionTruncation) -> Option<ClientInfo> {
    ClientFamily::ALL.iter().find_map(|&family| {
        let list = rules.clients(family)?;
        if family == ClientFamily::Browser {
            return browser::detect(rules, list, ua, truncation);
        }

        let (rule, caps) = list.first_match(ua)?;
        let name = build_by_match(&rule.name, &caps);
        if name.is_empty() {
            return None;
        }
        let version = rule
            .version
            .as_deref()
            .and_then(|template| build_version(template, &caps, truncation));

        Some(ClientInfo {
            family,
            name,
            short: UNKNOWN.to_string(),
            version,
            engine: None,
            engine_version: None,
            browser_family: None,
        })
    })
}
