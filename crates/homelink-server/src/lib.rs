//! Thin HTTP backend exposing aggregated device telemetry.
//!
//! All aggregation logic lives in `homelink-core`; this crate only maps
//! HTTP requests onto the [`homelink_core::DeviceService`] facade and
//! core errors back onto HTTP responses.

pub mod routes;

pub use routes::{AppState, create_router};
