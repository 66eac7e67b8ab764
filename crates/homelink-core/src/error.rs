// ── Core error types ──
//
// Caller-facing errors from homelink-core. Consumers never see reqwest
// failures or JSON parse errors directly; the `From<homelink_api::Error>`
// impl translates transport-layer errors into domain-appropriate
// variants, preserving the vendor payload for diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller input rejected before any vendor traffic.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Vendor API failure, with the upstream status and payload when known.
    #[error("Vendor API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        details: Option<serde_json::Value>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<homelink_api::Error> for CoreError {
    fn from(err: homelink_api::Error) -> Self {
        match err {
            homelink_api::Error::Config { message } => CoreError::Config { message },
            homelink_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            homelink_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
                details: None,
            },
            homelink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            homelink_api::Error::RateLimited { .. } => CoreError::Api {
                message: "rate limited by the vendor API".into(),
                status: Some(429),
                details: None,
            },
            homelink_api::Error::Api {
                status,
                message,
                body,
            } => CoreError::Api {
                message,
                status: Some(status),
                details: body,
            },
            homelink_api::Error::Deserialization { message } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
