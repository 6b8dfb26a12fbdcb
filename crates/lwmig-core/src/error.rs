// ── Core error types ──
//
// Run-level errors from lwmig-core. Per-device provisioning failures are
// NOT here: they are reported through `ProvisionError` inside the migration
// report and never abort a run.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed (HTTP {status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lwmig_api::Error> for CoreError {
    fn from(err: lwmig_api::Error) -> Self {
        match err {
            lwmig_api::Error::Authentication { status, message } => {
                CoreError::AuthenticationFailed { status, message }
            }
            lwmig_api::Error::InvalidHeader(message) => CoreError::Config {
                message: format!("Invalid bearer token: {message}"),
            },
            lwmig_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    CoreError::Api {
                        message: e.to_string(),
                        status: Some(status.as_u16()),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            lwmig_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lwmig_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lwmig_api::Error::Api { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            lwmig_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
