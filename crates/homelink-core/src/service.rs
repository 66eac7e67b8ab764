// ── Device service facade ──

use std::sync::Arc;

use homelink_api::InsightsClient;

use crate::enrich::{EnrichmentPipeline, RetryPolicy};
use crate::error::CoreError;
use crate::model::device::DeviceSummary;
use crate::normalize::normalize;

/// High-level entry point combining the enrichment pipeline and the
/// normalizer. This is the one canonical implementation of device
/// aggregation; every caller (HTTP route or otherwise) goes through it.
pub struct DeviceService {
    pipeline: EnrichmentPipeline,
}

impl DeviceService {
    pub fn new(client: Arc<InsightsClient>, policy: RetryPolicy) -> Self {
        Self {
            pipeline: EnrichmentPipeline::new(client, policy),
        }
    }

    /// Aggregate the deduplicated, classified device summaries for a
    /// router. Sequential pacing makes this scale linearly with device
    /// count; callers budget a generous timeout accordingly.
    pub async fn devices_for_router(&self, router_id: &str) -> Result<Vec<DeviceSummary>, CoreError> {
        let records = self.pipeline.list_devices(router_id).await?;
        Ok(normalize(records))
    }
}
