//! Compiled user-agent patterns.

use regex::{Captures, Regex, RegexBuilder};
use std::fmt;

/// Prefix that keeps rule patterns from matching in the middle of a token.
///
/// A rule only matches at the start of the string or after a character that
/// cannot be part of an identifier; `sprd-` and `MZ-` are vendor prefixes
/// that are glued to model names in the wild.
const RULE_BOUNDARY: &str = r"(?:^|[^A-Z0-9\-_]|[^A-Z0-9\-]_|sprd-|MZ-)";

/// Looser prefix used by the orchestrator's heuristic fragments.
const HEURISTIC_BOUNDARY: &str = r"(?:^|[^A-Z_-])";

const SIZE_LIMIT: usize = 64 * (1 << 20);

/// A case-insensitive, boundary-anchored regular expression.
///
/// The boundary prefix is non-capturing, so `$1` in a rule still refers to
/// the first group the rule author wrote.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a rule pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Self::with_boundary(source, RULE_BOUNDARY)
    }

    /// Compile a heuristic fragment with the looser boundary.
    pub fn heuristic(source: &str) -> Result<Self, regex::Error> {
        Self::with_boundary(source, HEURISTIC_BOUNDARY)
    }

    /// Compile a single pattern accepting any of `sources`.
    ///
    /// Matches whenever at least one of the sources would match on its own;
    /// used as a pre-filter in front of long rule lists.
    pub fn any_of<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Self, regex::Error> {
        let joined = sources
            .into_iter()
            .map(|s| format!("(?:{})", s))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(&joined)
    }

    fn with_boundary(source: &str, boundary: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("{}(?:{})", boundary, source))
            .case_insensitive(true)
            .size_limit(SIZE_LIMIT)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written in the rule file.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether the pattern matches anywhere in `ua`.
    pub fn is_match(&self, ua: &str) -> bool {
        self.regex.is_match(ua)
    }

    /// Match `ua` and return the capture groups.
    pub fn captures<'u>(&self, ua: &'u str) -> Option<Captures<'u>> {
        self.regex.captures(ua)
    }

    /// Iterate over the end offsets of all non-overlapping matches.
    pub fn match_ends<'p, 'u>(&'p self, ua: &'u str) -> impl Iterator<Item = usize> + 'p
    where
        'u: 'p,
    {
        self.regex.find_iter(ua).map(|m| m.end())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}
