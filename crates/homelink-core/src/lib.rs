//! Domain layer between `homelink-api` and the HTTP surface.
//!
//! This crate owns the device telemetry aggregation logic:
//!
//! - **[`EnrichmentPipeline`]** — drives the list → detail fan-out against
//!   the vendor API. Detail fetches are deliberately sequential with fixed
//!   pacing and exponential backoff on throttling; per-device failures
//!   degrade to the basic list record rather than failing the request.
//! - **[`normalize()`]** — deduplicates the pipeline's raw output and maps
//!   the vendor's heterogeneous field names onto the stable
//!   [`DeviceSummary`] contract, including signal-quality classification.
//! - **[`DeviceService`]** — facade combining both; the one canonical
//!   implementation of device aggregation.
//!
//! Raw records are ephemeral: produced fresh per request, reshaped, and
//! dropped. Nothing in this crate caches device state.

pub mod enrich;
pub mod error;
pub mod model;
pub mod normalize;
pub mod service;

pub use enrich::{EnrichmentPipeline, RetryPolicy};
pub use error::CoreError;
pub use model::device::{DeviceSummary, SignalLevel, SignalQuality};
pub use model::raw::RawDevice;
pub use normalize::normalize;
pub use service::DeviceService;
