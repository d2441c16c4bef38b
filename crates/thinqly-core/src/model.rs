// ── Domain model ──
//
// Snapshot types are built fresh each refresh cycle and never mutated
// after construction; the `FleetSnapshot` is the unit of cache
// replacement. Serde renames keep the wire shape of the dashboard API
// stable (`type`, `raw_type`, `home_status`).

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Placeholder rendered wherever a name or reading is unavailable.
pub const PLACEHOLDER: &str = "\u{2014}";

/// One configured home: where to poll and with what credentials.
///
/// Immutable during a refresh cycle. `home_id` is the stable join key
/// between configuration and snapshots.
#[derive(Debug, Clone)]
pub struct HomeConfig {
    pub home_id: String,
    pub home_name: String,
    pub server_url: Url,
    /// Personal access token for the ThinQ API. May be empty, in which
    /// case the home is reported offline without any remote call.
    pub pat: SecretString,
    pub country: String,
    pub client_id: String,
}

impl HomeConfig {
    pub fn has_pat(&self) -> bool {
        !self.pat.expose_secret().is_empty()
    }
}

/// Coarse device classification inferred from ThinQ's free-text type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceClass {
    AirConditioner,
    Refrigerator,
    Washer,
    Dryer,
    Other,
}

impl DeviceClass {
    /// Case-insensitive substring match over the raw type field.
    /// First matching rule wins, in this order.
    pub fn guess(raw: &str) -> Self {
        let s = raw.to_uppercase();
        if s.contains("AIR") && s.contains("CONDITION") {
            Self::AirConditioner
        } else if s.contains("REFRIG") {
            Self::Refrigerator
        } else if s.contains("WASH") {
            Self::Washer
        } else if s.contains("DRY") {
            Self::Dryer
        } else {
            Self::Other
        }
    }
}

/// Rolled-up per-home status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HomeStatus {
    Online,
    Partial,
    Offline,
}

impl HomeStatus {
    /// Pure aggregation over device counts.
    pub fn from_counts(total: usize, offline: usize) -> Self {
        if total == 0 || offline == total {
            Self::Offline
        } else if offline == 0 {
            Self::Online
        } else {
            Self::Partial
        }
    }
}

/// One device's state as observed during a single cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub class: DeviceClass,
    pub online: bool,
    #[serde(rename = "raw_type")]
    pub raw_class: String,
    /// Opaque state document; shape varies by device class.
    pub state: Value,
    pub summary: String,
}

/// One home's aggregated snapshot for a single cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeSnapshot {
    pub home_id: String,
    pub home_name: String,
    #[serde(rename = "home_status")]
    pub status: HomeStatus,
    pub updated_at: DateTime<Utc>,
    pub offline_count: usize,
    pub total_devices: usize,
    pub devices: Vec<DeviceSnapshot>,
    /// Set when the whole home failed (missing PAT, listing failure).
    /// An errored home always has zero devices and `Offline` status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The complete fleet as of one refresh cycle. Always swapped into the
/// cache whole, so readers never see a mix of old and new homes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub last_refresh: Option<DateTime<Utc>>,
    pub homes: Vec<HomeSnapshot>,
}

impl FleetSnapshot {
    /// The startup-empty snapshot served before the first cycle lands.
    pub fn empty() -> Self {
        Self::default()
    }
}
