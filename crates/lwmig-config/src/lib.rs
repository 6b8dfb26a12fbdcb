//! Layered configuration for lwmig.
//!
//! TOML file, environment variables using the deployment's historical names
//! (`TEKTELIC_*`, `TTS_*`, `LWMIG_*`), bearer-token resolution
//! (env + keyring + plaintext), and translation to
//! `lwmig_core::MigrationConfig`. The binary applies its flag overrides
//! (including `LWMIG_DEVICES`, which must stay a raw string list) on top of
//! the loaded [`Config`] before translating it.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lwmig_core::{
    LorawanSettings, MigrationConfig, SourceConfig, TargetConfig, TlsVerification,
    config::{DEFAULT_FREQUENCY_PLAN_ID, DEFAULT_LORAWAN_PHY_VERSION, DEFAULT_LORAWAN_VERSION},
};

/// Keyring service name under which bearer tokens are stored.
pub const KEYRING_SERVICE: &str = "lwmig";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting {field}")]
    Missing { field: String, env: &'static str },

    #[error("no bearer token configured for {backend}")]
    NoCredentials { backend: Backend },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Which side of the migration a setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Source,
    Target,
}

impl Backend {
    fn section(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration as read from file and environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub migration: Migration,

    #[serde(default)]
    pub defaults: Defaults,
}

/// `[source]`: the Tektelic platform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// Name of an environment variable holding the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_env: Option<String>,
}

/// `[target]`: The Things Stack.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Cluster host written as the device's NS and AS address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_env: Option<String>,

    #[serde(default = "default_lorawan_version")]
    pub lorawan_version: String,

    #[serde(default = "default_lorawan_phy_version")]
    pub lorawan_phy_version: String,

    #[serde(default = "default_frequency_plan_id")]
    pub frequency_plan_id: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            base_url: None,
            host: None,
            app_id: None,
            bearer_token: None,
            bearer_token_env: None,
            lorawan_version: default_lorawan_version(),
            lorawan_phy_version: default_lorawan_phy_version(),
            frequency_plan_id: default_frequency_plan_id(),
        }
    }
}

/// `[migration]`: what to move.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Migration {
    /// Device EUIs to migrate; empty migrates the whole application.
    #[serde(default)]
    pub devices: Vec<String>,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for Migration {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            concurrency: default_concurrency(),
        }
    }
}

/// `[defaults]`: transport tuning shared by both backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_lorawan_version() -> String {
    DEFAULT_LORAWAN_VERSION.into()
}
fn default_lorawan_phy_version() -> String {
    DEFAULT_LORAWAN_PHY_VERSION.into()
}
fn default_frequency_plan_id() -> String {
    DEFAULT_FREQUENCY_PLAN_ID.into()
}
fn default_concurrency() -> usize {
    1
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Copy with every bearer token replaced by a placeholder.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.source.bearer_token.is_some() {
            cfg.source.bearer_token = Some(REDACTED.into());
        }
        if cfg.target.bearer_token.is_some() {
            cfg.target.bearer_token = Some(REDACTED.into());
        }
        cfg
    }

    /// Render as TOML with tokens redacted.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.redacted())?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "lwmig", "lwmig").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("lwmig");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Variables taken verbatim. Figment's `Env` would read `00042` as the
/// number 42.
const VERBATIM_ENV: [(&str, &str); 4] = [
    ("TEKTELIC_APP_ID", "source.app_id"),
    ("TEKTELIC_BEARER_TOKEN", "source.bearer_token"),
    ("TTS_APP_ID", "target.app_id"),
    ("TTS_BEARER_TOKEN", "target.bearer_token"),
];

/// Defaults, then the TOML file at `path`, then the environment.
pub fn layered(path: &Path) -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("TEKTELIC_")
                .ignore(&["app_id", "bearer_token"])
                .map(|k| format!("source.{k}").into()),
        )
        .merge(
            Env::prefixed("TTS_")
                .ignore(&["app_id", "bearer_token"])
                .map(|k| format!("target.{k}").into()),
        )
        .merge(
            Env::prefixed("LWMIG_")
                .only(&["concurrency"])
                .map(|k| format!("migration.{k}").into()),
        )
        .merge(
            Env::prefixed("LWMIG_")
                .only(&["timeout", "insecure", "ca_cert"])
                .map(|k| format!("defaults.{k}").into()),
        );

    VERBATIM_ENV
        .iter()
        .fold(figment, |figment, &(var, key)| match std::env::var(var) {
            Ok(value) => figment.merge(Serialized::default(key, value)),
            Err(_) => figment,
        })
}

/// Load configuration. An explicit `path` must exist; the default location
/// is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(explicit) => {
            if !explicit.is_file() {
                return Err(ConfigError::NotFound {
                    path: explicit.to_path_buf(),
                });
            }
            explicit.to_path_buf()
        }
        None => config_path(),
    };

    let config: Config = layered(&path).extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a backend's bearer token: named env var, then the system keyring,
/// then the plaintext value.
pub fn resolve_token(
    backend: Backend,
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. bearer_token_env → env var lookup
    if let Some(env_name) = token_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.trim().is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(backend)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext (config file or TEKTELIC_/TTS_BEARER_TOKEN)
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        return Ok(SecretString::from(token.to_owned()));
    }

    Err(ConfigError::NoCredentials { backend })
}

/// Keyring account name for a backend's token, e.g. `source/bearer-token`.
pub fn keyring_user(backend: Backend) -> String {
    format!("{backend}/bearer-token")
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate and translate into the immutable run configuration.
pub fn to_migration_config(cfg: &Config) -> Result<MigrationConfig, ConfigError> {
    let source = source_config(cfg)?;
    let target = target_config(cfg)?;

    let concurrency =
        NonZeroUsize::new(cfg.migration.concurrency).ok_or_else(|| ConfigError::Validation {
            field: "migration.concurrency".into(),
            reason: "must be at least 1".into(),
        })?;

    for eui in &cfg.migration.devices {
        validate_eui(eui)?;
    }

    Ok(MigrationConfig {
        source,
        target,
        devices: cfg.migration.devices.clone(),
        concurrency,
        tls: tls_verification(cfg),
        timeout: timeout(cfg),
    })
}

/// The `[source]` section alone, for commands that never touch the target.
pub fn source_config(cfg: &Config) -> Result<SourceConfig, ConfigError> {
    Ok(SourceConfig {
        url: parse_url(
            cfg.source.base_url.as_deref(),
            "source.base_url",
            "TEKTELIC_BASE_URL",
        )?,
        token: resolve_token(
            Backend::Source,
            cfg.source.bearer_token.as_deref(),
            cfg.source.bearer_token_env.as_deref(),
        )?,
        application_id: required(cfg.source.app_id.as_deref(), "source.app_id", "TEKTELIC_APP_ID")?,
    })
}

pub fn target_config(cfg: &Config) -> Result<TargetConfig, ConfigError> {
    Ok(TargetConfig {
        url: parse_url(cfg.target.base_url.as_deref(), "target.base_url", "TTS_BASE_URL")?,
        host: required(cfg.target.host.as_deref(), "target.host", "TTS_HOST")?,
        token: resolve_token(
            Backend::Target,
            cfg.target.bearer_token.as_deref(),
            cfg.target.bearer_token_env.as_deref(),
        )?,
        application_id: required(cfg.target.app_id.as_deref(), "target.app_id", "TTS_APP_ID")?,
        lorawan: LorawanSettings {
            lorawan_version: cfg.target.lorawan_version.clone(),
            lorawan_phy_version: cfg.target.lorawan_phy_version.clone(),
            frequency_plan_id: cfg.target.frequency_plan_id.clone(),
        },
    })
}

/// `insecure` wins over `ca_cert`.
pub fn tls_verification(cfg: &Config) -> TlsVerification {
    if cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.defaults.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

pub fn timeout(cfg: &Config) -> Duration {
    Duration::from_secs(cfg.defaults.timeout)
}

fn required(value: Option<&str>, field: &str, env: &'static str) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ConfigError::Missing {
            field: field.into(),
            env,
        })
}

fn parse_url(value: Option<&str>, field: &str, env: &'static str) -> Result<url::Url, ConfigError> {
    let raw = required(value, field, env)?;
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got {raw}"),
        });
    }
    Ok(url)
}

/// A device EUI is 16 hex digits.
fn validate_eui(eui: &str) -> Result<(), ConfigError> {
    if eui.len() == 16 && eui.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: "migration.devices".into(),
            reason: format!("'{eui}' is not a 16-digit hex device EUI"),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn eui_validation() {
        assert!(validate_eui("8c83fc05007296e7").is_ok());
        assert!(validate_eui("8C83FC05007296E").is_err());
        assert!(validate_eui("8C83FC05007296EZ").is_err());
    }

    #[test]
    fn redaction_only_touches_present_tokens() {
        let mut cfg = Config::default();
        cfg.source.bearer_token = Some("secret".into());

        let redacted = cfg.redacted();
        assert_eq!(redacted.source.bearer_token.as_deref(), Some(REDACTED));
        assert_eq!(redacted.target.bearer_token, None);

        let rendered = cfg.to_redacted_toml().unwrap();
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("frequency_plan_id = \"AU_915_928_FSB_1\""));
    }

    #[test]
    fn keyring_accounts_are_per_backend() {
        assert_eq!(keyring_user(Backend::Source), "source/bearer-token");
        assert_eq!(keyring_user(Backend::Target), "target/bearer-token");
    }
}
