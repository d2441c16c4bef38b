// Route handlers. Wire shapes here are load-bearing: the dashboard
// front end keys off `_meta`, `home_status`, and the `{"error": ...}`
// envelope, so changes ripple into its JavaScript.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use thinqly_core::{DEFAULT_SERVER, HomeConfig};

use crate::AppState;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => {
                warn!(error = %msg, "admin request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/admin/homes", post(add_home))
        .route("/api/admin/homes/{home_id}", delete(delete_home))
        .route("/health", get(health))
        .with_state(state)
}

/// Cache-only status read. Returns the published snapshot with the
/// refresh metadata attached as `_meta`; never waits on a refresh.
async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (snapshot, meta) = state.poller.snapshot_with_meta();
    let mut payload =
        serde_json::to_value(snapshot.as_ref()).map_err(|e| ApiError::Internal(e.to_string()))?;
    let meta = serde_json::to_value(&meta).map_err(|e| ApiError::Internal(e.to_string()))?;
    if let Value::Object(map) = &mut payload {
        map.insert("_meta".to_owned(), meta);
    }
    Ok(Json(payload))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct AddHomeRequest {
    home_name: Option<String>,
    pat: Option<String>,
    country: Option<String>,
    client_id: Option<String>,
    server: Option<String>,
}

async fn add_home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddHomeRequest>,
) -> Result<Json<Value>, ApiError> {
    check_admin(&state, &headers)?;

    let home_name = trimmed(body.home_name.as_deref());
    let pat = trimmed(body.pat.as_deref());
    let (Some(home_name), Some(pat)) = (home_name, pat) else {
        return Err(ApiError::BadRequest("home_name and pat required".into()));
    };

    let country = trimmed(body.country.as_deref())
        .unwrap_or_else(|| "KR".into())
        .to_uppercase();
    let client_id = trimmed(body.client_id.as_deref())
        .unwrap_or_else(|| format!("team-dashboard-{}", short_hex(8)));
    let server = trimmed(body.server.as_deref()).unwrap_or_else(|| DEFAULT_SERVER.into());
    let server_url =
        Url::parse(&server).map_err(|e| ApiError::BadRequest(format!("bad server URL: {e}")))?;

    let home_id = short_hex(10);
    let home = HomeConfig {
        home_id: home_id.clone(),
        home_name,
        server_url,
        pat: pat.into(),
        country,
        client_id,
    };

    let mut homes = state
        .homes
        .list_homes()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    homes.push(home);
    state
        .homes
        .replace_homes(homes)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(home_id = %home_id, "home added");
    state.poller.request_refresh();
    Ok(Json(json!({ "ok": true, "home_id": home_id })))
}

async fn delete_home(
    State(state): State<AppState>,
    Path(home_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    check_admin(&state, &headers)?;

    let mut homes = state
        .homes
        .list_homes()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let before = homes.len();
    homes.retain(|h| h.home_id != home_id);
    if homes.len() == before {
        return Err(ApiError::NotFound("home not found".into()));
    }

    state
        .homes
        .replace_homes(homes)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(home_id = %home_id, "home deleted");
    state.poller.request_refresh();
    Ok(Json(json!({ "ok": true, "deleted": home_id })))
}

/// Admin gate: enforced only when an admin key is configured.
fn check_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.admin_key.as_deref() else {
        return Ok(());
    };
    let presented = headers.get("x-admin-key").and_then(|v| v.to_str().ok());
    if presented == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// First `n` hex chars of a random UUID, matching the dashboard's
/// short home and client identifiers.
fn short_hex(n: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(n);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_rejects_blank() {
        assert_eq!(trimmed(None), None);
        assert_eq!(trimmed(Some("   ")), None);
        assert_eq!(trimmed(Some("  x ")), Some("x".to_owned()));
    }

    #[test]
    fn short_hex_lengths() {
        assert_eq!(short_hex(10).len(), 10);
        assert_eq!(short_hex(8).len(), 8);
        assert!(short_hex(10).chars().all(|c| c.is_ascii_hexdigit()));
    }
}
