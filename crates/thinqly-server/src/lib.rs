//! HTTP front end for the thinqly dashboard.
//!
//! Every read is served from the status cache; nothing in here ever
//! calls the ThinQ API on the request path. Admin writes go through
//! the homes store and then fire a refresh trigger so the next
//! snapshot reflects them quickly.

pub mod api;

use std::sync::Arc;

use thinqly_core::{HomesStore, Poller};

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub poller: Poller,
    pub homes: Arc<dyn HomesStore>,
    /// When `None`, admin endpoints are open (local deployments).
    pub admin_key: Option<String>,
}
