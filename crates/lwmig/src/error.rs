//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into user-facing errors with
//! actionable help text. Per-device provisioning failures never reach this
//! type: they are logged by the migrator and the run still exits 0.

use miette::Diagnostic;
use thiserror::Error;

use lwmig_config::{ConfigError, KEYRING_SERVICE};
use lwmig_core::CoreError;

/// Process exit codes. clap exits with 2 on usage errors.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const AUTH: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const CONNECTION: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(lwmig::no_config),
        help(
            "Pass --config <path>, or create the default file.\n\
             Expected at: {default_path}"
        )
    )]
    NoConfig { path: String, default_path: String },

    #[error("Missing required setting {field}")]
    #[diagnostic(
        code(lwmig::missing_setting),
        help("Set `{field}` in the config file or export {env}.")
    )]
    MissingSetting { field: String, env: String },

    #[error("No bearer token configured for the {backend}")]
    #[diagnostic(
        code(lwmig::no_credentials),
        help(
            "Provide one of:\n  \
             - {backend}.bearer_token_env naming an environment variable\n  \
             - a keyring entry (service `{service}`, account `{account}`)\n  \
             - {backend}.bearer_token in the config file"
        )
    )]
    NoCredentials {
        backend: String,
        service: String,
        account: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lwmig::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load configuration")]
    #[diagnostic(code(lwmig::config_load), help("{message}"))]
    ConfigLoad { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(lwmig::connection_failed),
        help(
            "Check base_url and network access.\n\
             For self-signed stacks use --insecure (-k) or set defaults.ca_cert.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed (HTTP {status})")]
    #[diagnostic(
        code(lwmig::auth_failed),
        help("Verify the bearer token for this backend and its rights.\n{message}")
    )]
    AuthFailed { status: u16, message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(lwmig::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(lwmig::output))]
    Output(String),

    #[error("{0}")]
    #[diagnostic(code(lwmig::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. }
            | Self::MissingSetting { .. }
            | Self::NoCredentials { .. }
            | Self::Validation { .. }
            | Self::ConfigLoad { .. } => exit_code::CONFIG,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ApiError { .. } | Self::Output(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => CliError::NoConfig {
                path: path.display().to_string(),
                default_path: lwmig_config::config_path().display().to_string(),
            },
            ConfigError::Missing { field, env } => CliError::MissingSetting {
                field,
                env: env.into(),
            },
            ConfigError::NoCredentials { backend } => CliError::NoCredentials {
                backend: backend.to_string(),
                service: KEYRING_SERVICE.into(),
                account: lwmig_config::keyring_user(backend),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::ConfigLoad {
                message: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Output(e.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { status, message } => {
                CliError::AuthFailed { status, message }
            }
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::ConfigLoad { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lwmig_config::Backend;

    use super::*;

    #[test]
    fn config_errors_exit_with_config_code() {
        let err = CliError::from(ConfigError::Missing {
            field: "target.host".into(),
            env: "TTS_HOST",
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);

        let err = CliError::from(ConfigError::NotFound {
            path: PathBuf::from("/nope.toml"),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn missing_token_names_the_keyring_entry() {
        let err = CliError::from(ConfigError::NoCredentials {
            backend: Backend::Target,
        });
        match err {
            CliError::NoCredentials {
                backend, account, ..
            } => {
                assert_eq!(backend, "target");
                assert_eq!(account, "target/bearer-token");
            }
            other => panic!("expected NoCredentials, got {other:?}"),
        }
    }

    #[test]
    fn core_errors_keep_their_class() {
        let auth = CliError::from(CoreError::AuthenticationFailed {
            status: 401,
            message: "bad token".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let conn = CliError::from(CoreError::ConnectionFailed {
            url: "https://tektelic.example".into(),
            reason: "refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn api_error_message_includes_status_when_known() {
        let err = CliError::ApiError {
            status: Some(502),
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 502): bad gateway");

        let err = CliError::ApiError {
            status: None,
            message: "oops".into(),
        };
        assert_eq!(err.to_string(), "API error: oops");
    }
}
