// ── Device enrichment pipeline ──
//
// List → detail fan-out against the vendor API. Detail fetches run
// sequentially: the vendor rate-limits per client, so the pipeline
// self-throttles with fixed pacing instead of leaning on concurrency
// limits. Per-device failures degrade to the basic list record; only
// the list fetch itself is fatal to the operation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use homelink_api::InsightsClient;

use crate::error::CoreError;
use crate::model::raw::RawDevice;

/// Pacing and retry tuning for per-device detail fetches.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries consumed only by 429 responses; every other outcome
    /// terminates the per-device loop on first attempt.
    pub max_retries: u32,
    /// Pacing delay applied before every detail request, including the
    /// first. Doubles on each 429.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Per-device fetch state: `Pending → Enriching → {Enriched | Degraded}`.
///
/// The wait arithmetic is pure and clock-free so the exact delay sequence
/// is testable without timers: every attempt is preceded by a pace wait
/// of the current delay; a 429 adds a backoff wait of twice the current
/// delay, which also becomes the next pace delay.
#[derive(Debug)]
struct DetailFetch {
    delay: Duration,
    retries_left: u32,
}

impl DetailFetch {
    fn new(policy: RetryPolicy) -> Self {
        Self {
            delay: policy.base_delay,
            retries_left: policy.max_retries,
        }
    }

    /// Wait applied before the next request (pacing, independent of errors).
    fn pace(&self) -> Duration {
        self.delay
    }

    /// Register a 429 and return the backoff wait to apply.
    fn on_rate_limited(&mut self) -> Duration {
        let backoff = self.delay * 2;
        self.delay = backoff;
        self.retries_left = self.retries_left.saturating_sub(1);
        backoff
    }

    fn exhausted(&self) -> bool {
        self.retries_left == 0
    }
}

/// Terminal state of a per-device detail fetch.
enum DetailOutcome {
    /// Detail fields merged over the list record.
    Enriched(RawDevice),
    /// Detail unobtainable; the basic list record stands in.
    Degraded(RawDevice),
}

impl DetailOutcome {
    fn into_record(self) -> RawDevice {
        match self {
            Self::Enriched(record) | Self::Degraded(record) => record,
        }
    }
}

/// Orchestrates the list → detail fan-out for one router at a time.
pub struct EnrichmentPipeline {
    client: Arc<InsightsClient>,
    policy: RetryPolicy,
}

impl EnrichmentPipeline {
    pub fn new(client: Arc<InsightsClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Produce the full set of raw per-device records for a router,
    /// enriched with detail where obtainable.
    ///
    /// Partial enrichment is a normal outcome, not a failure: devices
    /// whose detail fetch degrades still appear with their list-derived
    /// fields. Only a failed list fetch aborts the operation.
    pub async fn list_devices(&self, router_id: &str) -> Result<Vec<RawDevice>, CoreError> {
        let serial = router_id.trim();
        if serial.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "router serial number is required".into(),
            });
        }

        let list = self.client.device_list(serial).await?;
        let entries = extract_device_entries(list);
        debug!(serial, count = entries.len(), "device list fetched");

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(device) = RawDevice::from_value(entry) else {
                continue;
            };
            let Some(mac) = device.identity().map(str::to_owned) else {
                continue;
            };
            let outcome = self.fetch_detail(serial, &mac, device).await;
            records.push(outcome.into_record());
        }
        Ok(records)
    }

    /// Run the per-device state machine to completion.
    async fn fetch_detail(&self, serial: &str, mac: &str, mut device: RawDevice) -> DetailOutcome {
        let mut fetch = DetailFetch::new(self.policy);

        loop {
            tokio::time::sleep(fetch.pace()).await;

            match self.client.device_detail(serial, mac).await {
                Ok(detail) => {
                    device.merge_detail(detail);
                    return DetailOutcome::Enriched(device);
                }
                Err(err) if err.is_rate_limited() => {
                    let backoff = fetch.on_rate_limited();
                    warn!(
                        mac,
                        "rate limited fetching device detail, backing off {}ms",
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                    if fetch.exhausted() {
                        warn!(mac, "detail retries exhausted, using basic record");
                        return DetailOutcome::Degraded(device);
                    }
                }
                Err(err) if err.is_not_found() => {
                    // Device vanished between list and detail. Handled, not an error.
                    warn!(mac, "device not found during detail fetch, using basic record");
                    return DetailOutcome::Degraded(device);
                }
                Err(err) => {
                    warn!(mac, "detail fetch failed, using basic record: {err}");
                    return DetailOutcome::Degraded(device);
                }
            }
        }
    }
}

/// Accept a bare array, `{"devices": [...]}`, or `{"deviceList": [...]}`;
/// anything else is an empty list.
fn extract_device_entries(list: Value) -> Vec<Value> {
    match list {
        Value::Array(items) => items,
        Value::Object(mut map) => map
            .remove("devices")
            .or_else(|| map.remove("deviceList"))
            .and_then(|v| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
