// ── Canonical client-facing device types ──

use serde::Serialize;

/// Signal-quality tier derived from vendor telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl SignalLevel {
    /// Human-readable label paired with the machine-readable level.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Unknown => "Unknown",
        }
    }
}

/// The `{label, level}` pair shipped to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalQuality {
    pub label: &'static str,
    pub level: SignalLevel,
}

impl From<SignalLevel> for SignalQuality {
    fn from(level: SignalLevel) -> Self {
        Self {
            label: level.label(),
            level,
        }
    }
}

/// The normalized, deduplicated device record returned to callers.
///
/// Produced fresh per request; never cached or persisted. Exactly one
/// summary exists per distinct device identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    /// Resolved identity: MAC address, device id, or generic id.
    pub id: String,
    pub name: String,
    pub connection_type: String,
    /// RSSI in dBm; more negative is weaker. Omitted when unreported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<f64>,
    /// Explicit `null` when the vendor reports no score.
    pub wifi_score: Option<f64>,
    pub ds_phy_rate_mbps: Option<f64>,
    pub us_phy_rate_mbps: Option<f64>,
    pub online: bool,
    pub signal_quality: SignalQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}
