use serde::{Deserialize, Serialize};

/// Browser/device attributes collected for 3DS risk assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserFingerprint {
    pub color_depth: u8,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minutes behind UTC, browser convention.
    pub timezone_offset: i32,
    pub user_agent: String,
    pub java_enabled: bool,
    pub javascript_enabled: bool,
}

impl Default for BrowserFingerprint {
    fn default() -> Self {
        Self {
            color_depth: 24,
            language: "pt-BR".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            timezone_offset: 180,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
            java_enabled: false,
            javascript_enabled: true,
        }
    }
}

/// Input to the simple variant's device-data execute call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDataRequest {
    pub amount: u64,
    pub currency: String,
    pub card: DeviceDataCard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceDataCard {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
}

/// Result of the device-data execute call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceDataResult {
    pub id_three_ds: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_serializes_all_fields() {
        let value = serde_json::to_value(BrowserFingerprint::default()).unwrap();
        for field in [
            "color_depth",
            "language",
            "screen_width",
            "screen_height",
            "timezone_offset",
            "user_agent",
            "java_enabled",
            "javascript_enabled",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
    }
}
