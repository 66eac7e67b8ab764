// ── Vendor endpoint and credential configuration ──
//
// Everything the Calix clients need to reach the cloud. Loaded once from
// `CALIX_*` environment variables by the server binary and handed down;
// the API clients themselves never read the environment.

use figment::Figment;
use figment::providers::Env;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::Error;

/// Connection and credential settings for the Calix Service Insights cloud.
///
/// `tenant` is the only optional field; everything else must be present
/// and non-blank before any network call is attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// OAuth token endpoint (`CALIX_AUTH_URL`).
    pub auth_url: Url,
    /// REST base URL for Service Insights (`CALIX_BASE_URL`).
    pub base_url: Url,
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
    /// Tenant discriminator for multi-tenant deployments.
    #[serde(default)]
    pub tenant: Option<String>,
}

impl InsightsConfig {
    /// Load configuration from `CALIX_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let config: Self = Figment::new()
            .merge(Env::prefixed("CALIX_"))
            .extract()
            .map_err(|e| Error::Config {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank credentials before any network traffic happens.
    fn validate(&self) -> Result<(), Error> {
        let required = [
            ("CALIX_CLIENT_ID", !self.client_id.is_empty()),
            (
                "CALIX_CLIENT_SECRET",
                !self.client_secret.expose_secret().is_empty(),
            ),
            ("CALIX_USERNAME", !self.username.is_empty()),
            ("CALIX_PASSWORD", !self.password.expose_secret().is_empty()),
        ];
        for (name, present) in required {
            if !present {
                return Err(Error::Config {
                    message: format!("{name} is not configured"),
                });
            }
        }
        Ok(())
    }
}
