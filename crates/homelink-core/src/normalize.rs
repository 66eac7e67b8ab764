// ── Device normalization ──
//
// Dedup + reshape of raw pipeline output into the DeviceSummary contract.
// Pure functions; all vendor field-name tolerance lives in RawDevice.

use indexmap::IndexMap;

use crate::model::device::{DeviceSummary, SignalLevel};
use crate::model::raw::RawDevice;

/// Deduplicate and reshape raw device records into the client contract.
///
/// One summary per distinct identity. When the same identity shows up
/// twice (list + detail merge across retries), a record observed online
/// replaces one not yet known to be online; otherwise the first-seen
/// record is kept. Records lacking every identity field are dropped.
pub fn normalize(records: Vec<RawDevice>) -> Vec<DeviceSummary> {
    let mut unique: IndexMap<String, RawDevice> = IndexMap::new();

    for record in records {
        let Some(id) = record.identity().map(str::to_owned) else {
            continue;
        };
        let keep_incoming = match unique.get(&id) {
            Some(existing) => !existing.is_online() && record.is_online(),
            None => true,
        };
        if keep_incoming {
            // Inserting over an existing key keeps its first-seen position.
            unique.insert(id, record);
        }
    }

    unique
        .into_iter()
        .map(|(id, record)| summarize(id, &record))
        .collect()
}

fn summarize(id: String, record: &RawDevice) -> DeviceSummary {
    DeviceSummary {
        id,
        name: resolve_name(record),
        connection_type: record.connection().unwrap_or("Wi-Fi").to_owned(),
        rssi: record.rssi(),
        wifi_score: record.wifi_score(),
        ds_phy_rate_mbps: record.ds_phy_rate(),
        us_phy_rate_mbps: record.us_phy_rate(),
        online: record.online_flag(),
        signal_quality: classify(record).into(),
        model: record.model().map(str::to_owned),
        manufacturer: record.manufacturer().map(str::to_owned),
    }
}

/// Host name → device name → MAC-derived → `"Unknown device"`.
///
/// A device whose only name is its MAC gets a friendlier synthesized
/// name from the MAC tail, punctuation preserved.
fn resolve_name(record: &RawDevice) -> String {
    if let Some(host) = record.host_name() {
        return host.to_owned();
    }
    if let Some(name) = record.device_name() {
        return name.to_owned();
    }
    match record.mac() {
        Some(mac) => format!("Device {}", mac_suffix(mac)),
        None => "Unknown device".to_owned(),
    }
}

/// Last 5 characters of the MAC string.
fn mac_suffix(mac: &str) -> &str {
    let start = mac.len().saturating_sub(5);
    mac.get(start..).unwrap_or(mac)
}

/// Signal-quality classification, strict priority: vendor bar count,
/// then wifi score, then RSSI, else Unknown. The first applicable source
/// decides alone — sources are never averaged or combined.
#[allow(clippy::float_cmp)] // vendor tiers are exact small integers
fn classify(record: &RawDevice) -> SignalLevel {
    if let Some(bars) = record.signal_bars() {
        return if bars >= 4.0 {
            SignalLevel::Excellent
        } else if bars == 3.0 {
            SignalLevel::Good
        } else if bars == 2.0 {
            SignalLevel::Fair
        } else {
            SignalLevel::Poor
        };
    }

    if let Some(score) = record.wifi_score() {
        return if score >= 4.0 {
            SignalLevel::Excellent
        } else if score == 3.0 {
            SignalLevel::Good
        } else if score == 2.0 {
            SignalLevel::Fair
        } else if score <= 1.0 {
            SignalLevel::Poor
        } else {
            // A fractional score between the tiers matches no rule.
            SignalLevel::Unknown
        };
    }

    if let Some(rssi) = record.rssi() {
        return if rssi >= -50.0 {
            SignalLevel::Excellent
        } else if rssi >= -60.0 {
            SignalLevel::Good
        } else if rssi >= -70.0 {
            SignalLevel::Fair
        } else {
            SignalLevel::Poor
        };
    }

    SignalLevel::Unknown
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn raw(value: Value) -> RawDevice {
        RawDevice::from_value(value).unwrap()
    }

    fn single(value: Value) -> DeviceSummary {
        let mut summaries = normalize(vec![raw(value)]);
        assert_eq!(summaries.len(), 1);
        summaries.remove(0)
    }

    fn level(value: Value) -> SignalLevel {
        single(value).signal_quality.level
    }

    // ── Deduplication ───────────────────────────────────────────────

    #[test]
    fn records_without_identity_are_excluded() {
        let summaries = normalize(vec![
            raw(json!({ "hostName": "ghost" })),
            raw(json!({ "macAddress": "aa:bb:cc:dd:ee:ff" })),
        ]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn duplicate_identities_collapse_to_one_summary() {
        let summaries = normalize(vec![
            raw(json!({ "macAddress": "aa:bb:cc:dd:ee:ff", "hostName": "first" })),
            raw(json!({ "macAddress": "aa:bb:cc:dd:ee:ff", "hostName": "second" })),
        ]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "first");
    }

    #[test]
    fn online_record_replaces_offline_duplicate() {
        let summaries = normalize(vec![
            raw(json!({ "macAddress": "aa:bb:cc:dd:ee:ff", "status": "offline" })),
            raw(json!({ "macAddress": "aa:bb:cc:dd:ee:ff", "status": "online" })),
        ]);

        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].online);
    }

    #[test]
    fn online_flag_is_true_if_any_duplicate_was_online() {
        // Either observation order ends online.
        for records in [
            vec![
                raw(json!({ "macAddress": "aa", "status": "online" })),
                raw(json!({ "macAddress": "aa", "status": "offline" })),
            ],
            vec![
                raw(json!({ "macAddress": "aa", "status": "offline" })),
                raw(json!({ "macAddress": "aa", "status": "online" })),
            ],
        ] {
            let summaries = normalize(records);
            assert!(summaries[0].online);
        }
    }

    // ── Signal classification ───────────────────────────────────────

    #[test]
    fn bars_beat_every_other_signal_source() {
        let result = level(json!({
            "macAddress": "aa",
            "signal-bars": 4,
            "wifiScore": 1,
            "rssi": -90,
        }));
        assert_eq!(result, SignalLevel::Excellent);
    }

    #[test]
    fn bar_counts_map_to_tiers() {
        assert_eq!(level(json!({ "id": "d", "signal-bars": 5 })), SignalLevel::Excellent);
        assert_eq!(level(json!({ "id": "d", "signal-bars": 4 })), SignalLevel::Excellent);
        assert_eq!(level(json!({ "id": "d", "signal-bars": 3 })), SignalLevel::Good);
        assert_eq!(level(json!({ "id": "d", "signal-bars": 2 })), SignalLevel::Fair);
        assert_eq!(level(json!({ "id": "d", "signal-bars": 1 })), SignalLevel::Poor);
        assert_eq!(level(json!({ "id": "d", "signal-bars": 0 })), SignalLevel::Poor);
    }

    #[test]
    fn wifi_score_boundaries() {
        assert_eq!(level(json!({ "id": "d", "wifiScore": 4 })), SignalLevel::Excellent);
        assert_eq!(level(json!({ "id": "d", "wifiScore": 3 })), SignalLevel::Good);
        assert_eq!(level(json!({ "id": "d", "wifiScore": 2 })), SignalLevel::Fair);
        assert_eq!(level(json!({ "id": "d", "wifiScore": 1 })), SignalLevel::Poor);
        assert_eq!(level(json!({ "id": "d", "wifiScore": 0 })), SignalLevel::Poor);
    }

    #[test]
    fn wifi_score_beats_rssi() {
        let result = level(json!({ "id": "d", "wifiScore": 2, "rssi": -40 }));
        assert_eq!(result, SignalLevel::Fair);
    }

    #[test]
    fn rssi_boundaries() {
        assert_eq!(level(json!({ "id": "d", "rssi": -50 })), SignalLevel::Excellent);
        assert_eq!(level(json!({ "id": "d", "rssi": -51 })), SignalLevel::Good);
        assert_eq!(level(json!({ "id": "d", "rssi": -60 })), SignalLevel::Good);
        assert_eq!(level(json!({ "id": "d", "rssi": -61 })), SignalLevel::Fair);
        assert_eq!(level(json!({ "id": "d", "rssi": -70 })), SignalLevel::Fair);
        assert_eq!(level(json!({ "id": "d", "rssi": -71 })), SignalLevel::Poor);
    }

    #[test]
    fn no_signal_sources_means_unknown() {
        assert_eq!(level(json!({ "id": "d" })), SignalLevel::Unknown);
    }

    // ── Name resolution ─────────────────────────────────────────────

    #[test]
    fn host_name_is_preferred() {
        let summary = single(json!({
            "macAddress": "AA:BB:CC:DD:EE:FF",
            "hostName": "living-room-tv",
            "deviceName": "TV",
        }));
        assert_eq!(summary.name, "living-room-tv");
    }

    #[test]
    fn device_name_used_when_host_name_missing() {
        let summary = single(json!({
            "macAddress": "AA:BB:CC:DD:EE:FF",
            "deviceName": "TV",
        }));
        assert_eq!(summary.name, "TV");
    }

    #[test]
    fn name_synthesized_from_mac_tail() {
        let summary = single(json!({ "macAddress": "AA:BB:CC:DD:EE:FF" }));
        assert_eq!(summary.name, "Device EE:FF");
    }

    #[test]
    fn unnamed_device_without_mac_is_unknown() {
        let summary = single(json!({ "deviceId": "dev-1" }));
        assert_eq!(summary.name, "Unknown device");
    }

    // ── Field mapping ───────────────────────────────────────────────

    #[test]
    fn connection_type_falls_back_to_wifi() {
        assert_eq!(single(json!({ "id": "d" })).connection_type, "Wi-Fi");
        assert_eq!(
            single(json!({ "id": "d", "interfaceType": "Ethernet" })).connection_type,
            "Ethernet"
        );
        assert_eq!(
            single(json!({ "id": "d", "connection": "5GHz", "interfaceType": "Ethernet" }))
                .connection_type,
            "5GHz"
        );
    }

    #[test]
    fn kebab_case_phy_rates_are_resolved() {
        let summary = single(json!({
            "id": "d",
            "DS-phy-rate": 866.7,
            "US-phy-rate": 433.3,
        }));
        assert_eq!(summary.ds_phy_rate_mbps, Some(866.7));
        assert_eq!(summary.us_phy_rate_mbps, Some(433.3));
    }

    #[test]
    fn model_and_manufacturer_chains_apply() {
        let summary = single(json!({
            "id": "d",
            "fingerprint-model": "iPhone 15",
            "model": "unused",
            "fingerpint-vendor": "Apple",
        }));
        assert_eq!(summary.model.as_deref(), Some("iPhone 15"));
        assert_eq!(summary.manufacturer.as_deref(), Some("Apple"));
    }
}
