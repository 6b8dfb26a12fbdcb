// Tektelic network server response types
//
// Device records come back with LoRaWAN credentials inline. Every credential
// field is optional: devices that never joined have no session address or
// session keys, and the inventory omits or nulls those fields.

use serde::{Deserialize, Serialize};

/// Collection envelope returned by the device listing endpoints.
///
/// ```json
/// { "totalElements": 1, "data": [ { "deviceEUI": "...", ... } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCollection {
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub data: Vec<SourceDevice>,
}

impl DeviceCollection {
    /// True when the inventory holds nothing to migrate.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A device as stored on the Tektelic platform.
///
/// Only the fields needed for ABP re-provisioning are modelled; everything
/// else the platform sends lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDevice {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "deviceEUI", default)]
    pub device_eui: Option<String>,
    #[serde(rename = "devAddress", default)]
    pub dev_address: Option<String>,
    #[serde(rename = "appSKey", default)]
    pub app_s_key: Option<String>,
    #[serde(rename = "nwkSKey", default)]
    pub nwk_s_key: Option<String>,
    #[serde(rename = "appEUI", default)]
    pub app_eui: Option<String>,
    #[serde(rename = "appKey", default)]
    pub app_key: Option<String>,

    /// Remaining fields, kept for display.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
