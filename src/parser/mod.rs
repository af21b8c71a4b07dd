//! Matchers for the individual classification stages.
//!
//! Each stage is a small pure function over a [`RuleStore`](crate::rules::RuleStore):
//! it walks the relevant ordered rule lists and extracts attributes from
//! the first match. Sequencing and the heuristics that combine stages live
//! in [`Detector`](crate::detector::Detector).

pub mod bot;
pub mod browser;
pub mod client;
pub mod device;
pub mod os;
pub mod vendor;

pub use bot::BotMatch;
pub use device::DeviceMatch;
