//! Rule data: ordered pattern lists, their YAML models and lookup tables.
//!
//! Every category is an ordered list in which the first matching rule
//! wins. [`RuleStore`] loads all categories once, validates them and keeps
//! the compiled patterns for the parsers.

mod category;
pub mod extract;
mod model;
mod pattern;
mod store;
pub mod tables;

pub use category::{DeviceFamily, RuleCategory, RuleSource};
pub use model::{
    BotEntry, BrowserEntry, ClientEntry, DeviceBrandEntry, DeviceBrandMap, EngineEntry, EngineRef,
    ModelEntry, OsEntry, ProducerEntry, VendorFragmentMap, VersionEntry,
};
pub use pattern::Pattern;
pub use store::{
    BotRule, ClientRule, DeviceRule, EngineRule, EngineSpec, ModelRule, OsRule, RuleStore,
    VendorFragment,
};

use regex::Captures;

/// A compiled rule that can be tried against a user agent.
pub trait Rule: Send + Sync {
    /// The rule's pattern.
    fn pattern(&self) -> &Pattern;
}

/// An ordered list of compiled rules of one category.
#[derive(Debug)]
pub struct RuleList<T> {
    category: RuleCategory,
    rules: Vec<T>,
}

impl<T: Rule> RuleList<T> {
    pub fn new(category: RuleCategory, rules: Vec<T>) -> Self {
        Self { category, rules }
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Find the first rule whose pattern matches `ua`.
    ///
    /// Rules are tried strictly in list order; later rules are never
    /// consulted once one matches.
    pub fn first_match<'r, 'u>(&'r self, ua: &'u str) -> Option<(&'r T, Captures<'u>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern().captures(ua).map(|caps| (rule, caps)))
    }

    /// Build a single pattern matching whenever any rule in the list does.
    pub fn combined(&self) -> Result<Option<Pattern>, regex::Error> {
        if self.rules.is_empty() {
            return Ok(None);
        }
        Pattern::any_of(self.rules.iter().map(|r| r.pattern().as_str())).map(Some)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
