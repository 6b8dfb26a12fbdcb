// The Things Stack v3 end-device request types
//
// Every write carries an explicit `field_mask`; the registries only touch
// the listed paths, so repeating a request converges instead of clobbering.
// Optional sections are skipped when empty so each registry sees exactly
// the fields it owns.

use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIdentifiers {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndDeviceIdentifiers {
    pub device_id: String,
    pub application_ids: ApplicationIdentifiers,
    pub dev_eui: String,
}

impl EndDeviceIdentifiers {
    pub fn new(device_id: &str, application_id: &str, dev_eui: &str) -> Self {
        Self {
            device_id: device_id.to_owned(),
            application_ids: ApplicationIdentifiers {
                application_id: application_id.to_owned(),
            },
            dev_eui: dev_eui.to_owned(),
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEnvelope {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_nwk_s_int_key: Option<KeyEnvelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_s_key: Option<KeyEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub dev_addr: String,
    pub keys: SessionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacSettings {
    pub supports_32_bit_f_cnt: bool,
}

// ── End device ───────────────────────────────────────────────────────

/// Partial end-device record. Which fields are populated depends on the
/// registry the request targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndDevice {
    pub ids: EndDeviceIdentifiers,

    // Identity Server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_server_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_server_address: Option<String>,

    // Network Server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lorawan_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lorawan_phy_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_settings: Option<MacSettings>,

    // Network + Application Server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl EndDevice {
    /// An end device carrying only its identifiers.
    pub fn with_ids(ids: EndDeviceIdentifiers) -> Self {
        Self {
            ids,
            name: None,
            description: None,
            network_server_address: None,
            application_server_address: None,
            lorawan_version: None,
            lorawan_phy_version: None,
            frequency_plan_id: None,
            mac_settings: None,
            session: None,
        }
    }
}

// ── Requests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

/// Body shared by the create (IS), set (NS) and set (AS) endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEndDeviceRequest {
    pub end_device: EndDevice,
    pub field_mask: FieldMask,
}

/// Field paths every request names for the device identifiers.
pub const ID_PATHS: [&str; 3] = [
    "ids.device_id",
    "ids.application_ids.application_id",
    "ids.dev_eui",
];
