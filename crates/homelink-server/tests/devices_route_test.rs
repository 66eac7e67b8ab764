#![allow(clippy::unwrap_used)]
// Route tests driving the axum router directly with tower's oneshot,
// with wiremock standing in for the vendor cloud.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use homelink_api::{AuthClient, InsightsClient, InsightsConfig, TransportConfig};
use homelink_core::{DeviceService, RetryPolicy};
use homelink_server::{AppState, create_router};

// ── Helpers ─────────────────────────────────────────────────────────

async fn test_app(server: &MockServer) -> Router {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;

    let config = InsightsConfig {
        auth_url: Url::parse(&format!("{}/oauth/token", server.uri())).unwrap(),
        base_url: Url::parse(&server.uri()).unwrap(),
        client_id: "client-1".into(),
        client_secret: SecretString::from("sekrit".to_string()),
        username: "ops".into(),
        password: SecretString::from("hunter2".to_string()),
        tenant: None,
    };

    let transport = TransportConfig::default();
    let auth = Arc::new(AuthClient::new(config.clone(), &transport).unwrap());
    let client = Arc::new(InsightsClient::new(&config, auth, &transport).unwrap());
    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(5),
    };
    let devices = Arc::new(DeviceService::new(client, policy));

    create_router(AppState { devices })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_identifier_is_rejected_with_400() {
    let server = MockServer::start().await;
    let app = test_app(&server).await;

    let (status, body) = get_json(app, "/api/devices").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Router serial number is required");
}

#[tokio::test]
async fn devices_are_returned_as_a_json_array() {
    let server = MockServer::start().await;
    let app = test_app(&server).await;

    Mock::given(method("GET"))
        .and(path("/system/device-list"))
        .and(query_param("serialNumber", "CXNK0012345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "macAddress": "aa:bb:cc:dd:ee:ff", "hostName": "laptop" },
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/device/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wifiScore": 4,
            "connection": "5GHz",
        })))
        .mount(&server)
        .await;

    let (status, body) = get_json(app, "/api/devices?routerNumber=CXNK0012345").await;

    assert_eq!(status, StatusCode::OK);
    let devices = body.as_array().expect("array body");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["name"], "laptop");
    assert_eq!(devices[0]["connectionType"], "5GHz");
    assert_eq!(devices[0]["wifiScore"], 4.0);
    assert_eq!(devices[0]["signalQuality"]["level"], "excellent");
}

#[tokio::test]
async fn serial_number_is_accepted_as_alias() {
    let server = MockServer::start().await;
    let app = test_app(&server).await;

    Mock::given(method("GET"))
        .and(path("/system/device-list"))
        .and(query_param("serialNumber", "CXNK0012345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(app, "/api/devices?serialNumber=CXNK0012345").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn vendor_list_failure_passes_status_and_payload_through() {
    let server = MockServer::start().await;
    let app = test_app(&server).await;

    Mock::given(method("GET"))
        .and(path("/system/device-list"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({
            "errorMessage": "upstream unavailable",
        })))
        .mount(&server)
        .await;

    let (status, body) = get_json(app, "/api/devices?routerNumber=CXNK0012345").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(
        body["error"].as_str().unwrap().contains("upstream unavailable"),
        "unexpected error body: {body}"
    );
    assert_eq!(body["details"]["errorMessage"], "upstream unavailable");
}
