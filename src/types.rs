//! Device type, client family and device class definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker reported for fields that no rule matched.
pub const UNKNOWN: &str = "UNK";

/// DeviceType is the hardware class of a detected device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum DeviceType {
    Desktop,
    Smartphone,
    Tablet,
    FeaturePhone,
    Console,
    Tv,
    CarBrowser,
    SmartDisplay,
    Camera,
    PortableMediaPlayer,
    Phablet,
    SmartSpeaker,
    Wearable,
    Peripheral,
}

impl DeviceType {
    /// All device types, in identifier order.
    pub const ALL: [DeviceType; 14] = [
        DeviceType::Desktop,
        DeviceType::Smartphone,
        DeviceType::Tablet,
        DeviceType::FeaturePhone,
        DeviceType::Console,
        DeviceType::Tv,
        DeviceType::CarBrowser,
        DeviceType::SmartDisplay,
        DeviceType::Camera,
        DeviceType::PortableMediaPlayer,
        DeviceType::Phablet,
        DeviceType::SmartSpeaker,
        DeviceType::Wearable,
        DeviceType::Peripheral,
    ];

    /// Parse a device type as written in rule files (`"feature phone"`,
    /// `"car browser"`, ...). Kebab-case identifiers are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', " ").as_str() {
            "desktop" => Some(DeviceType::Desktop),
            "smartphone" => Some(DeviceType::Smartphone),
            "tablet" => Some(DeviceType::Tablet),
            "feature phone" | "featurephone" => Some(DeviceType::FeaturePhone),
            "console" => Some(DeviceType::Console),
            "tv" => Some(DeviceType::Tv),
            "car browser" => Some(DeviceType::CarBrowser),
            "smart display" => Some(DeviceType::SmartDisplay),
            "camera" => Some(DeviceType::Camera),
            "portable media player" => Some(DeviceType::PortableMediaPlayer),
            "phablet" => Some(DeviceType::Phablet),
            "smart speaker" => Some(DeviceType::SmartSpeaker),
            "wearable" => Some(DeviceType::Wearable),
            "peripheral" => Some(DeviceType::Peripheral),
            _ => None,
        }
    }

    /// Get the stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Smartphone => "smartphone",
            DeviceType::Tablet => "tablet",
            DeviceType::FeaturePhone => "feature-phone",
            DeviceType::Console => "console",
            DeviceType::Tv => "tv",
            DeviceType::CarBrowser => "car-browser",
            DeviceType::SmartDisplay => "smart-display",
            DeviceType::Camera => "camera",
            DeviceType::PortableMediaPlayer => "portable-media-player",
            DeviceType::Phablet => "phablet",
            DeviceType::SmartSpeaker => "smart-speaker",
            DeviceType::Wearable => "wearable",
            DeviceType::Peripheral => "peripheral",
        }
    }

    /// Whether this type always counts as a mobile device.
    pub fn is_mobile(&self) -> bool {
        matches!(
            self,
            DeviceType::FeaturePhone
                | DeviceType::Smartphone
                | DeviceType::Tablet
                | DeviceType::Phablet
                | DeviceType::Camera
                | DeviceType::PortableMediaPlayer
        )
    }

    /// Whether this type never counts as a mobile device.
    ///
    /// Types that are neither always nor never mobile (wearables, car
    /// browsers, ...) are decided by the OS and client like an
    /// undetermined device.
    pub fn is_never_mobile(&self) -> bool {
        matches!(
            self,
            DeviceType::Tv | DeviceType::SmartDisplay | DeviceType::Console
        )
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ClientFamily is the kind of software that sent the user agent.
///
/// The declaration order is the order in which client families are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientFamily {
    FeedReader,
    MobileApp,
    MediaPlayer,
    Pim,
    Browser,
    Library,
}

impl ClientFamily {
    /// All client families, in matching order.
    pub const ALL: [ClientFamily; 6] = [
        ClientFamily::FeedReader,
        ClientFamily::MobileApp,
        ClientFamily::MediaPlayer,
        ClientFamily::Pim,
        ClientFamily::Browser,
        ClientFamily::Library,
    ];

    /// Get the stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientFamily::FeedReader => "feed-reader",
            ClientFamily::MobileApp => "mobile-app",
            ClientFamily::MediaPlayer => "media-player",
            ClientFamily::Pim => "pim",
            ClientFamily::Browser => "browser",
            ClientFamily::Library => "library",
        }
    }

    /// Parse a client family identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "feed-reader" => Some(ClientFamily::FeedReader),
            "mobile-app" => Some(ClientFamily::MobileApp),
            "media-player" => Some(ClientFamily::MediaPlayer),
            "pim" => Some(ClientFamily::Pim),
            "browser" => Some(ClientFamily::Browser),
            "library" => Some(ClientFamily::Library),
            _ => None,
        }
    }
}

impl fmt::Display for ClientFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// DeviceClass is the coarse bucket a requester falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Bot,
    Desktop,
    Mobile,
    #[default]
    Other,
}

impl DeviceClass {
    /// All device classes.
    pub const ALL: [DeviceClass; 4] = [
        DeviceClass::Bot,
        DeviceClass::Desktop,
        DeviceClass::Mobile,
        DeviceClass::Other,
    ];

    /// Get the stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Bot => "bot",
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Other => "other",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type_parse() {
        assert_eq!(DeviceType::parse("smartphone"), Some(DeviceType::Smartphone));
        assert_eq!(DeviceType::parse("feature phone"), Some(DeviceType::FeaturePhone));
        assert_eq!(DeviceType::parse("car-browser"), Some(DeviceType::CarBrowser));
        assert_eq!(DeviceType::parse("TV"), Some(DeviceType::Tv));
        assert_eq!(DeviceType::parse("toaster"), None);
    }

    #[test]
    fn test_device_type_identifiers_parse_back() {
        for device_type in DeviceType::ALL {
            assert_eq!(DeviceType::parse(device_type.as_str()), Some(device_type));
        }
    }

    #[test]
    fn test_mobile_device_types() {
        assert!(DeviceType::Smartphone.is_mobile());
        assert!(DeviceType::Camera.is_mobile());
        assert!(!DeviceType::Tv.is_mobile());
        assert!(!DeviceType::Desktop.is_mobile());
        assert!(!DeviceType::Wearable.is_mobile());

        assert!(DeviceType::SmartDisplay.is_never_mobile());
        assert!(DeviceType::Console.is_never_mobile());
        assert!(!DeviceType::Wearable.is_never_mobile());
        assert!(!DeviceType::Desktop.is_never_mobile());
    }

    #[test]
    fn test_client_family_order() {
        assert_eq!(ClientFamily::ALL[0], ClientFamily::FeedReader);
        assert_eq!(ClientFamily::ALL[4], ClientFamily::Browser);
        assert_eq!(ClientFamily::ALL[5], ClientFamily::Library);
        assert_eq!(ClientFamily::parse("feed reader"), Some(ClientFamily::FeedReader));
        assert_eq!(ClientFamily::parse("mobile_app"), Some(ClientFamily::MobileApp));
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceType::PortableMediaPlayer.to_string(), "portable-media-player");
        assert_eq!(ClientFamily::Pim.to_string(), "pim");
        assert_eq!(DeviceClass::Other.to_string(), "other");
    }
}
