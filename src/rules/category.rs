//! Rule categories and where their data comes from.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// RuleCategory identifies one ordered rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Bots,
    OperatingSystems,
    FeedReaders,
    MobileApps,
    MediaPlayers,
    Pim,
    Browsers,
    BrowserEngines,
    Libraries,
    Televisions,
    Notebooks,
    Consoles,
    CarBrowsers,
    Cameras,
    PortableMediaPlayers,
    Mobiles,
    VendorFragments,
}

impl RuleCategory {
    /// All categories.
    pub const ALL: [RuleCategory; 17] = [
        RuleCategory::Bots,
        RuleCategory::OperatingSystems,
        RuleCategory::FeedReaders,
        RuleCategory::MobileApps,
        RuleCategory::MediaPlayers,
        RuleCategory::Pim,
        RuleCategory::Browsers,
        RuleCategory::BrowserEngines,
        RuleCategory::Libraries,
        RuleCategory::Televisions,
        RuleCategory::Notebooks,
        RuleCategory::Consoles,
        RuleCategory::CarBrowsers,
        RuleCategory::Cameras,
        RuleCategory::PortableMediaPlayers,
        RuleCategory::Mobiles,
        RuleCategory::VendorFragments,
    ];

    /// Path of the rule file, relative to the rule directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            RuleCategory::Bots => "bots.yml",
            RuleCategory::OperatingSystems => "oss.yml",
            RuleCategory::FeedReaders => "client/feed_readers.yml",
            RuleCategory::MobileApps => "client/mobile_apps.yml",
            RuleCategory::MediaPlayers => "client/mediaplayers.yml",
            RuleCategory::Pim => "client/pim.yml",
            RuleCategory::Browsers => "client/browsers.yml",
            RuleCategory::BrowserEngines => "client/browser_engine.yml",
            RuleCategory::Libraries => "client/libraries.yml",
            RuleCategory::Televisions => "device/televisions.yml",
            RuleCategory::Notebooks => "device/notebooks.yml",
            RuleCategory::Consoles => "device/consoles.yml",
            RuleCategory::CarBrowsers => "device/car_browsers.yml",
            RuleCategory::Cameras => "device/cameras.yml",
            RuleCategory::PortableMediaPlayers => "device/portable_media_player.yml",
            RuleCategory::Mobiles => "device/mobiles.yml",
            RuleCategory::VendorFragments => "vendorfragments.yml",
        }
    }

    /// Rule data compiled into the binary.
    pub fn embedded(&self) -> &'static str {
        match self {
            RuleCategory::Bots => include_str!("../../data/bots.yml"),
            RuleCategory::OperatingSystems => include_str!("../../data/oss.yml"),
            RuleCategory::FeedReaders => include_str!("../../data/client/feed_readers.yml"),
            RuleCategory::MobileApps => include_str!("../../data/client/mobile_apps.yml"),
            RuleCategory::MediaPlayers => include_str!("../../data/client/mediaplayers.yml"),
            RuleCategory::Pim => include_str!("../../data/client/pim.yml"),
            RuleCategory::Browsers => include_str!("../../data/client/browsers.yml"),
            RuleCategory::BrowserEngines => include_str!("../../data/client/browser_engine.yml"),
            RuleCategory::Libraries => include_str!("../../data/client/libraries.yml"),
            RuleCategory::Televisions => include_str!("../../data/device/televisions.yml"),
            RuleCategory::Notebooks => include_str!("../../data/device/notebooks.yml"),
            RuleCategory::Consoles => include_str!("../../data/device/consoles.yml"),
            RuleCategory::CarBrowsers => include_str!("../../data/device/car_browsers.yml"),
            RuleCategory::Cameras => include_str!("../../data/device/cameras.yml"),
            RuleCategory::PortableMediaPlayers => {
                include_str!("../../data/device/portable_media_player.yml")
            }
            RuleCategory::Mobiles => include_str!("../../data/device/mobiles.yml"),
            RuleCategory::VendorFragments => include_str!("../../data/vendorfragments.yml"),
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file_name();
        write!(f, "{}", name.strip_suffix(".yml").unwrap_or(name))
    }
}

/// DeviceFamily is one parser in the device chain.
///
/// The declaration order is the order in which device parsers are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    HbbTv,
    Notebook,
    Console,
    CarBrowser,
    Camera,
    PortableMediaPlayer,
    Mobile,
}

impl DeviceFamily {
    /// All device families, in matching order.
    pub const ALL: [DeviceFamily; 7] = [
        DeviceFamily::HbbTv,
        DeviceFamily::Notebook,
        DeviceFamily::Console,
        DeviceFamily::CarBrowser,
        DeviceFamily::Camera,
        DeviceFamily::PortableMediaPlayer,
        DeviceFamily::Mobile,
    ];

    /// Rule category holding this family's device table.
    pub fn category(&self) -> RuleCategory {
        match self {
            DeviceFamily::HbbTv => RuleCategory::Televisions,
            DeviceFamily::Notebook => RuleCategory::Notebooks,
            DeviceFamily::Console => RuleCategory::Consoles,
            DeviceFamily::CarBrowser => RuleCategory::CarBrowsers,
            DeviceFamily::Camera => RuleCategory::Cameras,
            DeviceFamily::PortableMediaPlayer => RuleCategory::PortableMediaPlayers,
            DeviceFamily::Mobile => RuleCategory::Mobiles,
        }
    }
}

/// Where rule data is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleSource {
    /// Rule files compiled into the crate
    #[default]
    Embedded,
    /// A directory laid out like `data/` (`bots.yml`, `client/*.yml`, ...)
    Directory(PathBuf),
    /// Embedded rules with some categories replaced by the given YAML
    Overlay(Vec<(RuleCategory, String)>),
}

impl RuleSource {
    /// Read the raw YAML of one category.
    pub fn read(&self, category: RuleCategory) -> Result<Cow<'static, str>> {
        match self {
            RuleSource::Embedded => Ok(Cow::Borrowed(category.embedded())),
            RuleSource::Directory(dir) => {
                let path = dir.join(category.file_name());
                let text = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("failed to read {}: {}", path.display(), e))
                })?;
                Ok(Cow::Owned(text))
            }
            RuleSource::Overlay(overrides) => Ok(overrides
                .iter()
                .rev()
                .find(|(c, _)| *c == category)
                .map(|(_, text)| Cow::Owned(text.clone()))
                .unwrap_or(Cow::Borrowed(category.embedded()))),
        }
    }

    /// Human-readable description for log messages.
    pub fn describe(&self) -> String {
        match self {
            RuleSource::Embedded => "embedded rules".to_string(),
            RuleSource::Directory(dir) => format!("rules from {}", dir.display()),
            RuleSource::Overlay(overrides) => {
                format!("embedded rules with {} override(s)", overrides.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(RuleCategory::Bots.to_string(), "bots");
        assert_eq!(RuleCategory::Mobiles.to_string(), "device/mobiles");
        assert_eq!(RuleCategory::Browsers.to_string(), "client/browsers");
    }

    #[test]
    fn test_embedded_data_present() {
        for category in RuleCategory::ALL {
            assert!(
                !category.embedded().trim().is_empty(),
                "no embedded data for {}",
                category
            );
        }
    }

    #[test]
    fn test_device_family_order() {
        assert_eq!(DeviceFamily::ALL[0], DeviceFamily::HbbTv);
        assert_eq!(DeviceFamily::ALL[6], DeviceFamily::Mobile);
        assert_eq!(
            DeviceFamily::PortableMediaPlayer.category(),
            RuleCategory::PortableMediaPlayers
        );
    }

    #[test]
    fn test_overlay_replaces_single_category() {
        let source = RuleSource::Overlay(vec![(RuleCategory::Bots, "[]".to_string())]);
        assert_eq!(source.read(RuleCategory::Bots).unwrap(), "[]");
        assert_eq!(
            source.read(RuleCategory::OperatingSystems).unwrap(),
            RuleCategory::OperatingSystems.embedded()
        );
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bots.yml"), "[]").unwrap();
        let source = RuleSource::Directory(dir.path().to_path_buf());
        assert_eq!(source.read(RuleCategory::Bots).unwrap(), "[]");
        assert!(matches!(
            source.read(RuleCategory::OperatingSystems),
            Err(Error::Config(_))
        ));
    }
}
