//! Attribute extraction from rule templates.
//!
//! Rule attributes such as `version: '$1'` or `model: 'Galaxy $2'` are
//! templates whose `$N` placeholders are filled from the capture groups of
//! the matching pattern.

use regex::Captures;
use std::cmp::Ordering;

use crate::options::VersionTruncation;

/// Fill `$1`..`$9` in `template` from `caps` and trim the result.
///
/// Placeholders for groups that did not participate in the match become
/// empty strings.
pub fn build_by_match(template: &str, caps: &Captures<'_>) -> String {
    if !template.contains('$') {
        return template.trim().to_string();
    }

    let mut out = template.to_string();
    for n in (1..=9).rev() {
        let placeholder = format!("${}", n);
        if out.contains(&placeholder) {
            let value = caps.get(n).map(|m| m.as_str()).unwrap_or("");
            out = out.replace(&placeholder, value);
        }
    }
    out.trim().to_string()
}

/// Build a version string from a template.
///
/// Underscores become dots, the result is truncated per `truncation`, and
/// leading/trailing spaces and dots are removed. Returns `None` for an
/// empty result.
pub fn build_version(
    template: &str,
    caps: &Captures<'_>,
    truncation: VersionTruncation,
) -> Option<String> {
    let version = build_by_match(template, caps).replace('_', ".");
    let version = truncate_version(&version, truncation);
    let version = version.trim_matches(|c| c == ' ' || c == '.');
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Keep the major component plus at most `max_minor_parts` minor ones.
pub fn truncate_version(version: &str, truncation: VersionTruncation) -> String {
    match truncation.max_minor_parts() {
        Some(minor) if version.matches('.').count() > minor => version
            .split('.')
            .take(minor + 1)
            .collect::<Vec<_>>()
            .join("."),
        _ => version.to_string(),
    }
}

/// Build a model name from a template.
///
/// Underscores become spaces and a trailing ` TD` marker is dropped. The
/// placeholder model `Build` (left behind by `Build/` tokens) and empty
/// results yield `None`.
pub fn build_model(template: &str, caps: &Captures<'_>) -> Option<String> {
    let model = build_by_match(template, caps).replace('_', " ");
    let model = strip_suffix_ignore_case(&model, " TD").trim();
    if model.is_empty() || model == "Build" {
        None
    } else {
        Some(model.to_string())
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    if s.len() >= suffix.len() {
        let split = s.len() - suffix.len();
        if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
            return &s[..split];
        }
    }
    s
}

/// Compare two dotted numeric versions.
///
/// Missing components count as zero, so `"8"` equals `"8.0"`. Returns
/// `None` when either side has a non-numeric component (`"XP"`, `"Vista"`).
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let parse = |v: &str| -> Option<Vec<u64>> {
        v.trim()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect()
    };
    let left = parse(a)?;
    let right = parse(b)?;

    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

/// Whether `version` is numerically at least `min`.
pub fn version_at_least(version: &str, min: &str) -> bool {
    matches!(
        compare_versions(version, min),
        Some(Ordering::Greater | Ordering::Equal)
    )
}
