// HTTP routes for device telemetry
//
// Query validation and error mapping only; aggregation lives in
// homelink-core. On list failures the vendor's status code and payload
// pass through to the client.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use homelink_core::{CoreError, DeviceService};

#[derive(Clone)]
pub struct AppState {
    pub devices: Arc<DeviceService>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/devices", get(list_devices))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `routerNumber` is canonical; `serialNumber` is accepted as an alias.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DevicesQuery {
    router_number: Option<String>,
    serial_number: Option<String>,
}

/// `GET /api/devices?routerNumber=<id>`
///
/// Returns the JSON array of device summaries. A missing identifier is
/// a 400; a router with no devices is an empty array, never a 404.
async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<DevicesQuery>,
) -> Response {
    let Some(serial) = query.router_number.or(query.serial_number) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Router serial number is required" })),
        )
            .into_response();
    };

    match state.devices.devices_for_router(&serial).await {
        Ok(devices) => Json(devices).into_response(),
        Err(err) => {
            error!("device aggregation failed: {err}");
            error_response(&err)
        }
    }
}

/// Map a core failure onto the vendor's status when known (else 500),
/// attaching the vendor payload as `details`.
fn error_response(err: &CoreError) -> Response {
    let (status, details) = match err {
        CoreError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, None),
        CoreError::Api {
            status, details, ..
        } => (
            status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            details.clone(),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };

    let body = json!({ "error": err.to_string(), "details": details });
    (status, Json(body)).into_response()
}
