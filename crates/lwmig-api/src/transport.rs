// Shared transport configuration for building reqwest::Client instances.
//
// Both the Tektelic and Things Stack clients share TLS and timeout settings
// through this module. Each client injects its own bearer header.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

const USER_AGENT: &str = concat!("lwmig/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-hosted stacks with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Build a header map carrying `{name}: Bearer {token}`, marked sensitive so
/// it never shows up in debug output.
pub fn bearer_headers(name: &'static str, token: &SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidHeader(e.to_string()))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(name), value);
    Ok(headers)
}

/// Parse a base URL, forcing a trailing slash so relative joins keep any
/// path prefix (`https://host/tts/` + `api/v3/...`).
pub(crate) fn normalize_base_url(raw: &str) -> Result<url::Url, Error> {
    let mut url = url::Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn body_preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn normalize_adds_trailing_slash() {
        let url = normalize_base_url("https://eu1.cloud.thethings.network").unwrap();
        assert_eq!(url.as_str(), "https://eu1.cloud.thethings.network/");

        let url = normalize_base_url("https://lns.example.com/tts").unwrap();
        assert_eq!(url.as_str(), "https://lns.example.com/tts/");
        assert_eq!(
            url.join("api/v3/applications").unwrap().as_str(),
            "https://lns.example.com/tts/api/v3/applications"
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let token = SecretString::from("abc123".to_string());
        let headers = bearer_headers("x-authorization", &token).unwrap();
        let value = headers.get("x-authorization").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
    }

    #[test]
    fn bearer_header_rejects_control_chars() {
        let token = SecretString::from("bad\ntoken".to_string());
        assert!(matches!(
            bearer_headers("authorization", &token),
            Err(Error::InvalidHeader(_))
        ));
    }
}
