// thinqly-api: Async Rust client for the LG ThinQ Connect device API.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{DEFAULT_SERVER, HomeAuth, ThinqClient};
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{DeviceDescriptor, DeviceInfo};
