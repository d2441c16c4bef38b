// ── Core error types ──
//
// Deliberately small: per-device and per-home failures are absorbed
// into snapshot fields by the pipeline and never travel through this
// channel. Only failures of cycle orchestration itself -- the homes
// store being unreadable -- propagate as errors.

use thiserror::Error;

use crate::homes::HomesStoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The homes store could not be read. Aborts the whole refresh
    /// cycle; the previously published snapshot stays in place.
    #[error("home configuration unavailable: {0}")]
    ConfigUnavailable(String),
}

impl From<HomesStoreError> for CoreError {
    fn from(err: HomesStoreError) -> Self {
        Self::ConfigUnavailable(err.to_string())
    }
}
