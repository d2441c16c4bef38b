// Wire types for the ThinQ Connect API.
//
// ThinQ wraps every payload in a `{"response": ...}` envelope and uses
// camelCase field names. Device metadata is only partially populated
// depending on model and firmware, so everything but the id is optional.

use serde::Deserialize;

/// The `{"response": ...}` envelope around every ThinQ payload.
///
/// `response` is defaulted so a missing key degrades to an empty
/// payload instead of a hard deserialization failure.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T: Default> {
    #[serde(default)]
    pub response: T,
}

/// One entry from `GET /devices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub device_id: String,
    #[serde(default)]
    pub device_info: DeviceInfo,
}

/// Device metadata nested under `deviceInfo`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Free-text device type, e.g. `DEVICE_AIR_CONDITIONER`.
    #[serde(default)]
    pub device_type: Option<String>,
}
