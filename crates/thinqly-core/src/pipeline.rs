// ── Fetch pipeline ──
//
// Builds one cycle's snapshot: list devices per home, fetch state per
// device, roll statuses up. Failure containment is the whole point:
// a device failure marks that device offline, a home failure marks
// that home offline, and neither ever aborts the cycle. Homes are
// processed sequentially in config order; device-state fetches within
// a home run with bounded, order-preserving concurrency.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use thinqly_api::DeviceDescriptor;

use crate::model::{
    DeviceClass, DeviceSnapshot, FleetSnapshot, HomeConfig, HomeSnapshot, HomeStatus, PLACEHOLDER,
};
use crate::remote::RemoteApi;
use crate::summary::summarize;

/// How many device-state requests may be in flight per home. ThinQ's
/// per-PAT quota is tight, so this stays conservative.
const DEVICE_FETCH_CONCURRENCY: usize = 4;

/// Build the complete fleet snapshot for one cycle.
///
/// Infallible by design: every failure mode below the homes-store read
/// is folded into the snapshot itself.
pub async fn build_fleet_snapshot(remote: &dyn RemoteApi, homes: &[HomeConfig]) -> FleetSnapshot {
    let mut out = Vec::with_capacity(homes.len());
    for home in homes {
        out.push(build_home_snapshot(remote, home).await);
    }
    FleetSnapshot {
        last_refresh: Some(Utc::now()),
        homes: out,
    }
}

/// Build one home's snapshot. Never fails; a home-level problem comes
/// back as an `Offline` snapshot with `error` set and zero devices.
pub async fn build_home_snapshot(remote: &dyn RemoteApi, home: &HomeConfig) -> HomeSnapshot {
    let updated_at = Utc::now();

    // No credential: report offline without touching the network.
    if !home.has_pat() {
        return errored_home(home, updated_at, "missing PAT");
    }

    let descriptors = match remote.list_devices(home).await {
        Ok(d) => d,
        Err(e) => {
            warn!(home_id = %home.home_id, error = %e, "device listing failed");
            return errored_home(home, updated_at, &e.to_string());
        }
    };

    let devices: Vec<DeviceSnapshot> = stream::iter(descriptors)
        .map(|desc| fetch_device(remote, home, desc))
        .buffered(DEVICE_FETCH_CONCURRENCY)
        .collect()
        .await;

    let total = devices.len();
    let offline = devices.iter().filter(|d| !d.online).count();

    HomeSnapshot {
        home_id: home.home_id.clone(),
        home_name: home.home_name.clone(),
        status: HomeStatus::from_counts(total, offline),
        updated_at,
        offline_count: offline,
        total_devices: total,
        devices,
        error: None,
    }
}

/// Fetch one device's state and assemble its snapshot. A fetch failure
/// marks the device offline with an empty state document; it never
/// affects the rest of the home.
async fn fetch_device(
    remote: &dyn RemoteApi,
    home: &HomeConfig,
    desc: DeviceDescriptor,
) -> DeviceSnapshot {
    let raw_class = desc.device_info.device_type.clone().unwrap_or_default();
    let class = DeviceClass::guess(&raw_class);
    let name = device_name(&desc);

    let (online, state) = match remote.get_device_state(home, &desc.device_id).await {
        Ok(state) => (true, state),
        Err(e) => {
            debug!(
                home_id = %home.home_id,
                device_id = %desc.device_id,
                error = %e,
                "device state fetch failed"
            );
            (false, Value::Object(Map::new()))
        }
    };

    let summary = summarize(class, &state);

    DeviceSnapshot {
        device_id: desc.device_id,
        name,
        class,
        online,
        raw_class,
        state,
        summary,
    }
}

/// Name resolution priority: alias, model name, device id, placeholder.
/// First non-empty wins.
fn device_name(desc: &DeviceDescriptor) -> String {
    [
        desc.device_info.alias.as_deref(),
        desc.device_info.model_name.as_deref(),
        Some(desc.device_id.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .unwrap_or(PLACEHOLDER)
    .to_owned()
}

fn errored_home(home: &HomeConfig, updated_at: DateTime<Utc>, error: &str) -> HomeSnapshot {
    HomeSnapshot {
        home_id: home.home_id.clone(),
        home_name: home.home_name.clone(),
        status: HomeStatus::Offline,
        updated_at,
        offline_count: 0,
        total_devices: 0,
        devices: Vec::new(),
        error: Some(error.to_owned()),
    }
}
