//! Classification result types.

use serde::{Deserialize, Serialize};

use crate::types::{ClientFamily, DeviceClass, DeviceType, UNKNOWN};

/// Producer of a bot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotProducer {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Details of a detected bot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BotInfo {
    pub name: String,
    pub category: Option<String>,
    pub url: Option<String>,
    pub producer: Option<BotProducer>,
}

/// Detected operating system.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    /// Three-letter code, or [`UNKNOWN`] when the name is not in the OS table
    pub short: String,
    pub version: Option<String>,
    /// CPU architecture family (`ARM`, `x64`, ...)
    pub platform: Option<String>,
    pub family: Option<String>,
}

/// Detected client application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub family: ClientFamily,
    pub name: String,
    /// Two-letter code for browsers, [`UNKNOWN`] for other families
    pub short: String,
    pub version: Option<String>,
    /// Rendering engine, browsers only
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    /// Browser family (`Chrome`, `Firefox`, ...), browsers only
    pub browser_family: Option<String>,
}

/// Detected device hardware.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: Option<DeviceType>,
    pub brand: Option<String>,
    pub brand_short: Option<String>,
    pub model: Option<String>,
}

/// Structured description of a user agent.
///
/// Exactly one side is populated: a bot result carries no OS, client or
/// device data, and a non-bot result carries no bot data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub user_agent: String,
    pub is_bot: bool,
    /// Bot details; `None` for bots when details were discarded
    pub bot: Option<BotInfo>,
    pub os: Option<OsInfo>,
    pub client: Option<ClientInfo>,
    pub device: DeviceInfo,
    pub class: DeviceClass,
    pub touch_enabled: bool,
    pub(crate) mobile: bool,
    pub(crate) desktop: bool,
}

impl ClassificationResult {
    /// A result with every field at its unknown value.
    pub fn unknown(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            ..Self::default()
        }
    }

    /// Whether the device counts as mobile.
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Whether the device counts as desktop.
    pub fn is_desktop(&self) -> bool {
        self.desktop
    }

    /// Whether the UA advertises touch capability.
    pub fn is_touch_enabled(&self) -> bool {
        self.touch_enabled
    }

    /// Check the detected device type.
    pub fn is_device(&self, device_type: DeviceType) -> bool {
        self.device.device_type == Some(device_type)
    }

    /// Check the detected client family.
    pub fn is_client(&self, family: ClientFamily) -> bool {
        self.client.as_ref().map(|c| c.family) == Some(family)
    }

    /// Device type identifier, `"other"` when undetermined.
    pub fn device_type_str(&self) -> &str {
        self.device
            .device_type
            .as_ref()
            .map(DeviceType::as_str)
            .unwrap_or("other")
    }

    /// OS name or [`UNKNOWN`].
    pub fn os_name(&self) -> &str {
        self.os.as_ref().map(|os| os.name.as_str()).unwrap_or(UNKNOWN)
    }

    /// OS short code or [`UNKNOWN`].
    pub fn os_short(&self) -> &str {
        self.os.as_ref().map(|os| os.short.as_str()).unwrap_or(UNKNOWN)
    }

    /// OS version or [`UNKNOWN`].
    pub fn os_version(&self) -> &str {
        self.os
            .as_ref()
            .and_then(|os| os.version.as_deref())
            .unwrap_or(UNKNOWN)
    }

    /// Client name or [`UNKNOWN`].
    pub fn client_name(&self) -> &str {
        self.client.as_ref().map(|c| c.name.as_str()).unwrap_or(UNKNOWN)
    }

    /// Client version or [`UNKNOWN`].
    pub fn client_version(&self) -> &str {
        self.client
            .as_ref()
            .and_then(|c| c.version.as_deref())
            .unwrap_or(UNKNOWN)
    }

    /// Device brand or [`UNKNOWN`].
    pub fn brand(&self) -> &str {
        self.device.brand.as_deref().unwrap_or(UNKNOWN)
    }

    /// Device model or [`UNKNOWN`].
    pub fn model(&self) -> &str {
        self.device.model.as_deref().unwrap_or(UNKNOWN)
    }

    /// Bot name or [`UNKNOWN`]; also [`UNKNOWN`] for non-bots.
    pub fn bot_name(&self) -> &str {
        self.bot.as_ref().map(|b| b.name.as_str()).unwrap_or(UNKNOWN)
    }

    /// Whether nothing at all was recognized.
    pub fn is_unknown(&self) -> bool {
        !self.is_bot
            && self.os.is_none()
            && self.client.is_none()
            && self.device == DeviceInfo::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_result() {
        let result = ClassificationResult::unknown("12345");
        assert!(result.is_unknown());
        assert!(!result.is_bot);
        assert_eq!(result.class, DeviceClass::Other);
        assert_eq!(result.os_name(), UNKNOWN);
        assert_eq!(result.client_name(), UNKNOWN);
        assert_eq!(result.brand(), UNKNOWN);
        assert_eq!(result.device_type_str(), "other");
    }

    #[test]
    fn test_predicates() {
        let result = ClassificationResult {
            user_agent: "x".to_string(),
            client: Some(ClientInfo {
                family: ClientFamily::Browser,
                name: "Firefox".to_string(),
                short: "FF".to_string(),
                version: Some("120.0".to_string()),
                engine: Some("Gecko".to_string()),
                engine_version: None,
                browser_family: Some("Firefox".to_string()),
            }),
            device: DeviceInfo {
                device_type: Some(DeviceType::Tablet),
                ..DeviceInfo::default()
            },
            ..ClassificationResult::default()
        };
        assert!(result.is_device(DeviceType::Tablet));
        assert!(!result.is_device(DeviceType::Smartphone));
        assert!(result.is_client(ClientFamily::Browser));
        assert!(!result.is_client(ClientFamily::Library));
        assert_eq!(result.client_version(), "120.0");
        assert!(!result.is_unknown());
    }

    #[test]
    fn test_serialization_surface() {
        let result = ClassificationResult {
            user_agent: "x".to_string(),
            device: DeviceInfo {
                device_type: Some(DeviceType::CarBrowser),
                ..DeviceInfo::default()
            },
            ..ClassificationResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["device"]["type"], "car-browser");
        assert_eq!(json["class"], "other");
        assert_eq!(json["is_bot"], false);
    }
}
