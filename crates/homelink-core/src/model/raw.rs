// ── Raw vendor device records ──
//
// The vendor reports devices with field names that vary by API version:
// camelCase on some firmware, kebab-case on others, plus at least one
// long-standing typo. RawDevice wraps the untyped JSON map and exposes
// one ordered accessor chain per logical attribute, evaluated
// first-match-wins. All field-name tolerance lives here.

use serde_json::{Map, Value};

/// An un-normalized device record as returned by the vendor list/detail
/// endpoints. Ephemeral: produced fresh per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDevice(Map<String, Value>);

impl RawDevice {
    /// Wrap a JSON object; anything else is not a device record.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Overlay detail-endpoint fields onto this record.
    /// Detail wins on key collision.
    pub fn merge_detail(&mut self, detail: Value) {
        if let Value::Object(fields) = detail {
            self.0.extend(fields);
        }
    }

    // ── Accessor chains ─────────────────────────────────────────────

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn num_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.str_field(k))
    }

    fn first_num(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|k| self.num_field(k))
    }

    /// Device identity: MAC address, then device id, then generic id.
    /// Records without any of these are unusable and get dropped.
    pub fn identity(&self) -> Option<&str> {
        self.first_str(&["macAddress", "deviceId", "id"])
    }

    pub fn mac(&self) -> Option<&str> {
        self.str_field("macAddress")
    }

    pub fn host_name(&self) -> Option<&str> {
        self.str_field("hostName")
    }

    pub fn device_name(&self) -> Option<&str> {
        self.str_field("deviceName")
    }

    pub fn connection(&self) -> Option<&str> {
        self.first_str(&["connection", "interfaceType"])
    }

    /// RSSI in dBm. Non-numeric values are treated as absent.
    pub fn rssi(&self) -> Option<f64> {
        self.first_num(&["rssi", "signal-strength", "wifiSignalStrength"])
    }

    /// Wi-Fi health score. Presence wins over truthiness: a reported 0
    /// is a real (bad) score, not an absent one.
    pub fn wifi_score(&self) -> Option<f64> {
        self.first_num(&["wifiScore", "wifi-score", "client-efficiency-score"])
    }

    pub fn ds_phy_rate(&self) -> Option<f64> {
        self.first_num(&["dsPhyRate", "DS-phy-rate", "downstreamRate"])
    }

    pub fn us_phy_rate(&self) -> Option<f64> {
        self.first_num(&["usPhyRate", "US-phy-rate", "upstreamRate"])
    }

    /// Vendor-supplied discrete signal tier (0–4+ bars).
    pub fn signal_bars(&self) -> Option<f64> {
        self.num_field("signal-bars")
    }

    pub fn model(&self) -> Option<&str> {
        self.first_str(&["fingerprint-model", "modelName", "model"])
    }

    /// `fingerpint-vendor` is a typo on the vendor side that still ships
    /// in production firmware. It is checked first, with the correctly
    /// spelled key second so fixed firmware keeps working. Permanent
    /// compatibility shim, not a bug.
    pub fn manufacturer(&self) -> Option<&str> {
        self.first_str(&["fingerpint-vendor", "fingerprint-vendor", "manufacturer"])
    }

    /// True when the record explicitly reports the device online.
    pub fn is_online(&self) -> bool {
        self.str_field("status") == Some("online")
            || self.0.get("online").and_then(Value::as_bool) == Some(true)
    }

    /// The `online` flag for the summary contract: true unless the
    /// record is explicitly determined offline. A record carrying no
    /// status information at all is assumed online.
    pub fn online_flag(&self) -> bool {
        if self.0.contains_key("status") || self.0.contains_key("online") {
            self.is_online()
        } else {
            true
        }
    }
}
