//! Configuration for the thinqly server.
//!
//! Two concerns live here: runtime settings (TOML file + environment,
//! merged through figment) and the file-backed homes store that the
//! refresh scheduler reads each cycle. Core never touches disk -- both
//! are constructed by the server binary and handed in.

mod settings;
mod store;

pub use settings::{ConfigError, Settings};
pub use store::JsonHomesStore;
