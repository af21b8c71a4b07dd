//! Brand detection from OEM vendor fragments.

use crate::rules::RuleStore;

/// Find the brand whose vendor fragment appears in `ua`.
pub fn detect(rules: &RuleStore, ua: &str) -> Option<String> {
    rules
        .vendor_fragments()
        .iter()
        .find(|vendor| vendor.patterns.iter().any(|p| p.is_match(ua)))
        .map(|vendor| vendor.brand.clone())
}
