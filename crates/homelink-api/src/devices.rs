// Service Insights device endpoints
//
// Read-only telemetry surface consumed by the enrichment pipeline.
// Responses are deliberately untyped: field names vary by vendor API
// version, and normalization happens downstream in homelink-core.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::InsightsClient;
use crate::error::Error;

impl InsightsClient {
    /// List devices attached to a router.
    ///
    /// `GET /system/device-list?serialNumber=<id>`
    pub async fn device_list(&self, serial_number: &str) -> Result<Value, Error> {
        debug!(serial_number, "fetching device list");
        self.call(
            "/system/device-list",
            &[("serialNumber", serial_number)],
            Method::GET,
        )
        .await
    }

    /// Fetch detail for one device on a router.
    ///
    /// `GET /device/detail?serialNumber=<id>&deviceMac=<mac>`
    pub async fn device_detail(
        &self,
        serial_number: &str,
        device_mac: &str,
    ) -> Result<Value, Error> {
        debug!(serial_number, device_mac, "fetching device detail");
        self.call(
            "/device/detail",
            &[
                ("serialNumber", serial_number),
                ("deviceMac", device_mac),
            ],
            Method::GET,
        )
        .await
    }
}
