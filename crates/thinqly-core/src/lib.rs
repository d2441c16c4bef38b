// thinqly-core: aggregation layer between thinqly-api and consumers.
//
// Owns the domain model, the per-home fetch pipeline, the status cache,
// and the background refresh scheduler. The HTTP front end only ever
// talks to the `Poller` -- it never touches the remote API directly.

pub mod error;
pub mod homes;
pub mod model;
pub mod pipeline;
pub mod poller;
pub mod remote;
pub mod store;
pub mod summary;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use homes::{HomesStore, HomesStoreError, MemoryHomesStore};
pub use model::{
    DeviceClass, DeviceSnapshot, FleetSnapshot, HomeConfig, HomeSnapshot, HomeStatus, PLACEHOLDER,
};
pub use poller::Poller;
pub use remote::{RemoteApi, ThinqRemote};
pub use store::{CacheMeta, StatusCache};
pub use summary::summarize;

// Re-export the API crate's surface that shows up in our signatures.
pub use thinqly_api::{DEFAULT_SERVER, DeviceDescriptor, DeviceInfo, TransportConfig};
pub use thinqly_api::Error as ApiError;
