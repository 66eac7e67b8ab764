//! Async client for the Calix Service Insights cloud API.
//!
//! This crate owns everything that talks to the vendor directly:
//!
//! - **[`InsightsConfig`]** — endpoint URLs and OAuth credentials, loaded
//!   from `CALIX_*` environment variables.
//! - **[`AuthClient`]** — obtains and caches a bearer token, refreshing or
//!   re-authenticating as needed. Sole owner of the token cache.
//! - **[`InsightsClient`]** — issues one authenticated request per call
//!   against the Service Insights REST surface, attaching the vendor's
//!   required headers. Endpoint methods live in [`devices`](mod@crate::devices).
//!
//! Retry policy deliberately does NOT live here: the vendor rate-limits
//! per client, and only the enrichment layer in `homelink-core` knows
//! which calls are safe to retry and which must degrade instead.

pub mod auth;
pub mod client;
pub mod config;
pub mod devices;
pub mod error;
pub mod transport;

pub use auth::AuthClient;
pub use client::InsightsClient;
pub use config::InsightsConfig;
pub use error::Error;
pub use transport::TransportConfig;

// Callers pick request methods through the same type reqwest uses.
pub use reqwest::Method;
