// ── Runtime migration configuration ──
//
// These types describe *what* to migrate and *where*. They carry credential
// data and connection tuning but never touch disk or the environment.
// `lwmig-config` builds a `MigrationConfig` once at startup and hands it in.

use std::num::NonZeroUsize;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// LoRaWAN MAC version used when none is configured.
pub const DEFAULT_LORAWAN_VERSION: &str = "1.0.2";
/// Regional parameters revision used when none is configured.
pub const DEFAULT_LORAWAN_PHY_VERSION: &str = "1.0.2-b";
/// Frequency plan used when none is configured.
pub const DEFAULT_FREQUENCY_PLAN_ID: &str = "AU_915_928_FSB_1";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on a private stack).
    DangerAcceptInvalid,
}

/// Source platform (Tektelic) connection.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: Url,
    pub token: SecretString,
    /// Application whose devices are migrated.
    pub application_id: String,
}

/// MAC-layer constants written to the Network Server for every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LorawanSettings {
    pub lorawan_version: String,
    pub lorawan_phy_version: String,
    pub frequency_plan_id: String,
}

impl Default for LorawanSettings {
    fn default() -> Self {
        Self {
            lorawan_version: DEFAULT_LORAWAN_VERSION.into(),
            lorawan_phy_version: DEFAULT_LORAWAN_PHY_VERSION.into(),
            frequency_plan_id: DEFAULT_FREQUENCY_PLAN_ID.into(),
        }
    }
}

/// Target stack (The Things Stack) connection.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// API base URL (e.g. `https://eu1.cloud.thethings.network`).
    pub url: Url,
    /// Cluster address written as the device's NS and AS address.
    pub host: String,
    pub token: SecretString,
    pub application_id: String,
    pub lorawan: LorawanSettings,
}

/// Everything one migration run needs.
///
/// Built by the binary, passed to [`Migrator`](crate::Migrator) -- core never
/// reads config files or environment variables.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    /// Device EUIs to migrate. Empty means every device of the application.
    pub devices: Vec<String>,
    /// Devices provisioned at once. 1 keeps the run strictly sequential.
    pub concurrency: NonZeroUsize,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}
