// The Things Stack v3 HTTP client
//
// Auth: `Authorization: Bearer <api key>`.
// One client covers all three registries; the role is picked by path
// (`/api/v3/applications` for IS, `/api/v3/ns/...` and `/api/v3/as/...`).

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::types::SetEndDeviceRequest;
use crate::error::Error;
use crate::transport::{TransportConfig, bearer_headers, body_preview, normalize_base_url};

/// Async client for The Things Stack end-device registries.
pub struct TtsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TtsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    pub fn new(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = bearer_headers("authorization", token)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = transport.build_client_with_headers(headers)?;
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    // ── Identity Server ──────────────────────────────────────────────

    /// Register the device identity and static metadata.
    ///
    /// `POST /api/v3/applications/{application_id}/devices`
    ///
    /// Returns `Error::Api { status: 409, .. }` if the device id or EUI is
    /// already registered.
    pub async fn create_end_device(
        &self,
        application_id: &str,
        request: &SetEndDeviceRequest,
    ) -> Result<serde_json::Value, Error> {
        self.post(&format!("api/v3/applications/{application_id}/devices"), request)
            .await
    }

    // ── Network Server ───────────────────────────────────────────────

    /// Set MAC-layer parameters and the network session.
    ///
    /// `PUT /api/v3/ns/applications/{application_id}/devices/{device_id}`
    pub async fn set_network_server_device(
        &self,
        application_id: &str,
        device_id: &str,
        request: &SetEndDeviceRequest,
    ) -> Result<serde_json::Value, Error> {
        self.put(
            &format!("api/v3/ns/applications/{application_id}/devices/{device_id}"),
            request,
        )
        .await
    }

    // ── Application Server ───────────────────────────────────────────

    /// Set the application session.
    ///
    /// `POST /api/v3/as/applications/{application_id}/devices`
    pub async fn set_application_server_device(
        &self,
        application_id: &str,
        request: &SetEndDeviceRequest,
    ) -> Result<serde_json::Value, Error> {
        self.post(&format!("api/v3/as/applications/{application_id}/devices"), request)
            .await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, Error> {
        let url = self.base_url.join(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, Error> {
        let url = self.base_url.join(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(resp: reqwest::Response) -> Result<serde_json::Value, Error> {
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
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", body_preview(&body)),
            body,
        })
    }
}
