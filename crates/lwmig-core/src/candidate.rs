// ── Migration candidates ──
//
// A `MigrationCandidate` is a source device proven to carry every value ABP
// provisioning needs. The only way to build one is `TryFrom<&SourceDevice>`,
// which refuses devices with any required field absent or blank.

use std::fmt;

use strum::IntoEnumIterator;
use thiserror::Error;

use lwmig_api::SourceDevice;

/// Source fields ABP provisioning cannot do without.
///
/// `Display` yields the field's name on the source platform, which is what
/// shows up in skip diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum RequiredField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "deviceEUI")]
    DeviceEui,
    #[strum(serialize = "devAddress")]
    DevAddress,
    #[strum(serialize = "appSKey")]
    AppSKey,
    #[strum(serialize = "nwkSKey")]
    NwkSKey,
    #[strum(serialize = "appEUI")]
    AppEui,
    #[strum(serialize = "appKey")]
    AppKey,
}

impl RequiredField {
    /// The field's value on `device`, if present and non-blank.
    fn value(self, device: &SourceDevice) -> Option<&str> {
        let raw = match self {
            Self::Name => &device.name,
            Self::DeviceEui => &device.device_eui,
            Self::DevAddress => &device.dev_address,
            Self::AppSKey => &device.app_s_key,
            Self::NwkSKey => &device.nwk_s_key,
            Self::AppEui => &device.app_eui,
            Self::AppKey => &device.app_key,
        };
        raw.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// Every required field `device` lacks, in declaration order.
pub fn missing_fields(device: &SourceDevice) -> Vec<RequiredField> {
    RequiredField::iter()
        .filter(|field| field.value(device).is_none())
        .collect()
}

/// Validation failure: the device cannot be provisioned for ABP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", join_fields(.0))]
pub struct MissingFields(pub Vec<RequiredField>);

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated, immutable projection of a source device.
///
/// Values are verbatim copies of the source. The display name keeps its
/// original case; [`device_id`](Self::device_id) lower-cases it for the
/// target stack.
#[derive(Clone, PartialEq, Eq)]
pub struct MigrationCandidate {
    device_name: String,
    dev_eui: String,
    dev_addr: String,
    app_s_key: String,
    nwk_s_key: String,
    app_eui: String,
    app_key: String,
}

impl MigrationCandidate {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Device EUI, the join key between source and target.
    pub fn dev_eui(&self) -> &str {
        &self.dev_eui
    }

    pub fn dev_addr(&self) -> &str {
        &self.dev_addr
    }

    pub fn app_s_key(&self) -> &str {
        &self.app_s_key
    }

    pub fn nwk_s_key(&self) -> &str {
        &self.nwk_s_key
    }

    pub fn app_eui(&self) -> &str {
        &self.app_eui
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Target-stack device id: the display name, lower-cased.
    pub fn device_id(&self) -> String {
        self.device_name.to_lowercase()
    }
}

impl TryFrom<&SourceDevice> for MigrationCandidate {
    type Error = MissingFields;

    fn try_from(device: &SourceDevice) -> Result<Self, Self::Error> {
        let field = |f: RequiredField| f.value(device).map(str::to_owned);

        match (
            field(RequiredField::Name),
            field(RequiredField::DeviceEui),
            field(RequiredField::DevAddress),
            field(RequiredField::AppSKey),
            field(RequiredField::NwkSKey),
            field(RequiredField::AppEui),
            field(RequiredField::AppKey),
        ) {
            (
                Some(device_name),
                Some(dev_eui),
                Some(dev_addr),
                Some(app_s_key),
                Some(nwk_s_key),
                Some(app_eui),
                Some(app_key),
            ) => Ok(Self {
                device_name,
                dev_eui,
                dev_addr,
                app_s_key,
                nwk_s_key,
                app_eui,
                app_key,
            }),
            _ => Err(MissingFields(missing_fields(device))),
        }
    }
}

// Session keys stay out of logs.
impl fmt::Debug for MigrationCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationCandidate")
            .field("device_name", &self.device_name)
            .field("dev_eui", &self.dev_eui)
            .field("dev_addr", &self.dev_addr)
            .field("app_eui", &self.app_eui)
            .field("app_s_key", &"[REDACTED]")
            .field("nwk_s_key", &"[REDACTED]")
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}
