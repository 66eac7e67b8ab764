// OAuth token acquisition and caching for the Calix cloud
//
// Token lifecycle: no token → password grant → valid; near expiry →
// refresh grant → valid, or fall back to a fresh password grant when the
// refresh is rejected. The cache lives behind a tokio mutex that is held
// across the grant round-trip, so concurrent callers never race into
// duplicate authentications.

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::InsightsConfig;
use crate::error::{Error, body_preview};
use crate::transport::TransportConfig;

/// Tokens are treated as expired this long before their actual expiry,
/// so a request never rides a token that dies mid-flight.
const EXPIRY_BUFFER_MS: i64 = 30 * 60 * 1000;

/// Lifetime assumed when the vendor supplies no expiry information.
const DEFAULT_LIFETIME_SECS: i64 = 3600;

/// The cached grant result. Owned exclusively by [`AuthClient`].
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_token: Option<String>,
    expires_at_ms: i64,
}

impl CachedToken {
    fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms - EXPIRY_BUFFER_MS
    }
}

/// Wire shape of the vendor token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    /// Absolute expiry; some tenants return it as a string.
    #[serde(default, deserialize_with = "number_or_string")]
    access_token_expiry_millis: Option<i64>,
}

/// `{"fault": {"faultstring": "...", "detail": {"errorcode": "..."}}}`
#[derive(Debug, Deserialize)]
struct FaultResponse {
    fault: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    faultstring: Option<String>,
    detail: Option<FaultDetail>,
}

#[derive(Debug, Deserialize)]
struct FaultDetail {
    errorcode: Option<String>,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Produces valid bearer tokens for gateway calls, minimizing redundant
/// authentication round-trips.
///
/// Callers hold an `Arc<AuthClient>` and pass it explicitly to the
/// gateway — there is no process-global token state.
pub struct AuthClient {
    http: reqwest::Client,
    config: InsightsConfig,
    cache: Mutex<Option<CachedToken>>,
}

impl AuthClient {
    pub fn new(config: InsightsConfig, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            config,
            cache: Mutex::new(None),
        })
    }

    /// Return a valid access token, authenticating only when needed.
    ///
    /// A cached token comfortably inside its expiry window is returned
    /// without any network traffic. Otherwise a refresh-token grant is
    /// attempted first; if that fails for any reason (or no refresh token
    /// is cached), a full password grant runs with the configured
    /// credentials.
    pub async fn access_token(&self) -> Result<String, Error> {
        let mut cache = self.cache.lock().await;
        let now_ms = Utc::now().timestamp_millis();

        if let Some(token) = cache.as_ref() {
            if token.is_fresh(now_ms) {
                return Ok(token.access_token.clone());
            }
        }

        if let Some(refresh_token) = cache.as_ref().and_then(|t| t.refresh_token.clone()) {
            debug!("attempting token refresh");
            match self.refresh_grant(&refresh_token).await {
                Ok(response) => {
                    let token = build_cached(response, Some(refresh_token))?;
                    let access = token.access_token.clone();
                    *cache = Some(token);
                    debug!("token refreshed");
                    return Ok(access);
                }
                Err(err) => {
                    warn!("token refresh failed, falling back to password grant: {err}");
                }
            }
        }

        let response = self.password_grant().await?;
        let token = build_cached(response, None)?;
        let access = token.access_token.clone();
        *cache = Some(token);
        debug!("token obtained via password grant");
        Ok(access)
    }

    // ── Grant flows ─────────────────────────────────────────────────

    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenResponse, Error> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_secret", self.config.client_secret.expose_secret()),
        ];
        self.send_grant(&form).await
    }

    async fn password_grant(&self) -> Result<TokenResponse, Error> {
        // Fail fast on blank credentials — no point hitting the network.
        let required = [
            ("CALIX_CLIENT_ID", self.config.client_id.as_str()),
            ("CALIX_USERNAME", self.config.username.as_str()),
            ("CALIX_PASSWORD", self.config.password.expose_secret()),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::Config {
                    message: format!("{name} is not configured"),
                });
            }
        }

        let mut form = vec![
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.expose_secret()),
        ];
        if let Some(tenant) = self.config.tenant.as_deref() {
            form.push(("tenant", tenant));
        }
        self.send_grant(&form).await
    }

    async fn send_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, Error> {
        debug!("requesting token from {}", self.config.auth_url);

        let resp = self
            .http
            .post(self.config.auth_url.clone())
            .header("X-Calix-ClientID", &self.config.client_id)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            // Apigee-style fault objects carry the useful diagnostics.
            if let Ok(FaultResponse { fault: Some(fault) }) = serde_json::from_str(&body) {
                let faultstring = fault.faultstring.unwrap_or_default();
                let errorcode = fault
                    .detail
                    .and_then(|d| d.errorcode)
                    .unwrap_or_default();
                return Err(Error::Authentication {
                    message: format!("Calix auth fault: {faultstring} ({errorcode})"),
                });
            }
            return Err(Error::Authentication {
                message: format!(
                    "token endpoint returned HTTP {status}: {}",
                    body_preview(&body)
                ),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Authentication {
            message: format!("malformed token response: {e}"),
        })
    }
}

/// Turn a grant response into a cache entry.
///
/// Expiry priority: the vendor's absolute timestamp, then a relative
/// `expires_in`, then a fixed default lifetime. The refresh token
/// rotates only when the server supplied a new one.
fn build_cached(
    response: TokenResponse,
    retained_refresh: Option<String>,
) -> Result<CachedToken, Error> {
    let access_token = response.access_token.ok_or_else(|| Error::Authentication {
        message: "no access_token in vendor response".into(),
    })?;

    let now_ms = Utc::now().timestamp_millis();
    let expires_at_ms = match (response.access_token_expiry_millis, response.expires_in) {
        (Some(millis), _) => millis,
        (None, Some(secs)) => now_ms + secs * 1000,
        (None, None) => now_ms + DEFAULT_LIFETIME_SECS * 1000,
    };

    Ok(CachedToken {
        access_token,
        refresh_token: response.refresh_token.or(retained_refresh),
        expires_at_ms,
    })
}
