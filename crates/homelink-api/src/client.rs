// Service Insights HTTP gateway
//
// One authenticated request per call. Token acquisition is delegated to
// the AuthClient handed in at construction; retry policy belongs to the
// enrichment layer, not here. Endpoint methods live in `devices.rs` as
// inherent impls to keep this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::AuthClient;
use crate::config::InsightsConfig;
use crate::error::{Error, body_preview};
use crate::transport::TransportConfig;

/// Raw HTTP client for the Service Insights REST surface.
///
/// Attaches the three headers the vendor requires on every call: the
/// bearer token, the client identifier, and (redundantly, per vendor
/// requirement) the raw access token in its own header. Responses come
/// back as untyped JSON — callers interpret the vendor-specific shapes.
pub struct InsightsClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    auth: Arc<AuthClient>,
}

impl InsightsClient {
    pub fn new(
        config: &InsightsConfig,
        auth: Arc<AuthClient>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: config.base_url.clone(),
            client_id: config.client_id.clone(),
            auth,
        })
    }

    /// The configured REST base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one authenticated request against a vendor REST path.
    ///
    /// `path` may omit the leading slash. Any non-2xx response surfaces
    /// as an error carrying the vendor payload when present; there is no
    /// automatic retry at this layer.
    pub async fn call(
        &self,
        path: &str,
        params: &[(&str, &str)],
        method: Method,
    ) -> Result<Value, Error> {
        let token = self.auth.access_token().await?;
        let url = self.endpoint_url(path)?;

        debug!("{method} {url}");

        let resp = self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("X-Calix-ClientID", &self.client_id)
            .header("X-Calix-AccessToken", &token)
            .query(params)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(resp).await
    }

    /// Build a full URL for a REST path, normalizing the leading slash.
    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }
}

/// Map a vendor response onto the error taxonomy, returning the parsed
/// body on success.
async fn parse_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(Error::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let payload: Option<Value> = serde_json::from_str(&body).ok();
        let message = payload
            .as_ref()
            .and_then(vendor_error_message)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| body_preview(&body));
        return Err(Error::Api {
            status: status.as_u16(),
            message,
            body: payload,
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", body_preview(&body)),
    })
}

/// The vendor's human-readable error string, wherever it hides.
fn vendor_error_message(payload: &Value) -> Option<&str> {
    payload
        .get("errorMessage")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .or_else(|| payload.pointer("/fault/faultstring").and_then(Value::as_str))
}
