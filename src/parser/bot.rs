//! Bot detection.

use crate::result::BotInfo;
use crate::rules::RuleStore;

/// A positive bot detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMatch {
    /// `None` when details were discarded
    pub info: Option<BotInfo>,
}

/// Check `ua` against the bot rules.
///
/// The combined pre-filter is tried first; with `discard_details` a
/// pre-filter hit is reported right away without walking the list.
pub fn detect(rules: &RuleStore, ua: &str, discard_details: bool) -> Option<BotMatch> {
    let prefilter = rules.bot_prefilter()?;
    if !prefilter.is_match(ua) {
        return None;
    }
    if discard_details {
        return Some(BotMatch { info: None });
    }

    let (rule, _) = rules.bots().first_match(ua)?;
    log::debug!("Bot rule {:?} matched", rule.pattern.as_str());
    Some(BotMatch {
        info: Some(rule.info.clone()),
    })
}
