// Tektelic HTTP client
//
// Auth: `X-Authorization: Bearer <token>` on every request.
// No pagination: each listing arrives in a single response.

use reqwest::header::{ACCEPT, HeaderValue};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::DeviceCollection;
use crate::error::Error;
use crate::transport::{TransportConfig, bearer_headers, body_preview, normalize_base_url};

/// Async client for the Tektelic network server REST API.
pub struct TektelicClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TektelicClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = bearer_headers("x-authorization", token)?;
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = transport.build_client_with_headers(headers)?;
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every device of an application.
    ///
    /// `GET /api/application/{application_id}/devices`
    pub async fn application_devices(&self, application_id: &str) -> Result<DeviceCollection, Error> {
        debug!(application_id, "listing application devices");
        self.get(&format!("api/application/{application_id}/devices"))
            .await
    }

    /// List every device of a customer.
    ///
    /// `GET /api/customer/{customer_id}/devices`
    pub async fn customer_devices(&self, customer_id: &str) -> Result<DeviceCollection, Error> {
        debug!(customer_id, "listing customer devices");
        self.get(&format!("api/customer/{customer_id}/devices"))
            .await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                status: status.as_u16(),
                message: body,
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", body_preview(&body)),
            body,
        })
    }
}
