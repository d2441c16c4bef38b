// ── Remote API seam ──
//
// The fetch pipeline talks to the device API through this trait so
// tests can substitute counting or failure-injecting fakes. The real
// implementation delegates to `thinqly_api::ThinqClient`, building the
// per-home auth block fresh for every call.

use async_trait::async_trait;
use serde_json::Value;

use thinqly_api::{DeviceDescriptor, Error as ApiError, HomeAuth, ThinqClient, TransportConfig};

use crate::model::HomeConfig;

/// The two ThinQ calls the pipeline needs, scoped to one home.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn list_devices(&self, home: &HomeConfig) -> Result<Vec<DeviceDescriptor>, ApiError>;

    async fn get_device_state(
        &self,
        home: &HomeConfig,
        device_id: &str,
    ) -> Result<Value, ApiError>;
}

/// Production implementation backed by the ThinQ HTTP client.
pub struct ThinqRemote {
    client: ThinqClient,
}

impl ThinqRemote {
    pub fn new(transport: &TransportConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: ThinqClient::new(transport)?,
        })
    }

    fn auth(home: &HomeConfig) -> HomeAuth {
        HomeAuth {
            server_url: home.server_url.clone(),
            pat: home.pat.clone(),
            country: home.country.clone(),
            client_id: home.client_id.clone(),
        }
    }
}

#[async_trait]
impl RemoteApi for ThinqRemote {
    async fn list_devices(&self, home: &HomeConfig) -> Result<Vec<DeviceDescriptor>, ApiError> {
        self.client.list_devices(&Self::auth(home)).await
    }

    async fn get_device_state(
        &self,
        home: &HomeConfig,
        device_id: &str,
    ) -> Result<Value, ApiError> {
        self.client
            .get_device_state(&Self::auth(home), device_id)
            .await
    }
}
