// ThinQ Connect HTTP client.
//
// Wraps `reqwest::Client` with per-call header construction and the
// 401 rate-limit reclassification. The client holds no per-home state:
// every call takes a `HomeAuth` and generates a fresh message id, so a
// single client instance serves an arbitrary number of homes.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{DeviceDescriptor, Envelope};

/// ThinQ Connect application key, sent as `x-api-key` on every request.
const THINQ_API_KEY: &str = "v6GFvkweNo7DK7yD3ylIZ9w52aKBU0eJ7wLXkSR3";

/// Regional API endpoint used when a home doesn't configure its own.
pub const DEFAULT_SERVER: &str = "https://api-kic.lgthinq.com";

/// Error code ThinQ uses for API-call quota exhaustion.
const RATE_LIMIT_CODE: &str = "1314";

/// Message fragment that accompanies the quota error.
const RATE_LIMIT_PHRASE: &str = "Exceeded User API calls";

/// Per-home call parameters: endpoint and credentials.
///
/// Built fresh for each refresh cycle from the home configuration;
/// the client never caches anything derived from it.
#[derive(Debug, Clone)]
pub struct HomeAuth {
    pub server_url: Url,
    /// Personal access token, sent as a bearer credential.
    pub pat: SecretString,
    pub country: String,
    pub client_id: String,
}

/// Raw HTTP client for the ThinQ Connect API.
///
/// Methods return unwrapped `response` payloads -- the envelope is
/// stripped before the caller sees it.
pub struct ThinqClient {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl ThinqClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self {
            http,
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
        }
    }

    /// Fresh `x-message-id` value: URL-safe base64 of random UUID bytes,
    /// unpadded, which is exactly 22 characters.
    pub fn message_id() -> String {
        URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET {server}/devices` -- list the devices registered to a home.
    pub async fn list_devices(&self, auth: &HomeAuth) -> Result<Vec<DeviceDescriptor>, Error> {
        let url = endpoint(auth, "devices")?;
        self.get_enveloped(url, auth).await
    }

    /// `GET {server}/devices/{id}/state` -- fetch one device's state
    /// document. The shape varies by device class, so this stays an
    /// opaque `Value`.
    pub async fn get_device_state(&self, auth: &HomeAuth, device_id: &str) -> Result<Value, Error> {
        let url = endpoint(auth, &format!("devices/{device_id}/state"))?;
        self.get_enveloped(url, auth).await
    }

    // ── Request plumbing ─────────────────────────────────────────────

    /// Send a GET, classify the status, and unwrap the envelope.
    async fn get_enveloped<T>(&self, url: Url, auth: &HomeAuth) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(auth.pat.expose_secret())
            .header("x-message-id", Self::message_id())
            .header("x-country", &auth.country)
            .header("x-client-id", &auth.client_id)
            .header("x-api-key", THINQ_API_KEY)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(classify_unauthorized(&body));
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: truncated(&body),
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(envelope.response)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }
}

/// Build `{server}/{path}`, tolerating a trailing slash on the base.
fn endpoint(auth: &HomeAuth, path: &str) -> Result<Url, Error> {
    let base = auth.server_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
}

/// Decide whether a 401 body is the disguised rate-limit error.
///
/// ThinQ reports quota exhaustion as a 401 whose body carries
/// `{"error": {"code": "1314", "message": "Exceeded User API calls"}}`.
/// Anything else -- a different code, a non-JSON body -- is a genuine
/// authentication failure.
fn classify_unauthorized(body: &str) -> Error {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        let err = &v["error"];
        let code = match &err["code"] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let message = err["message"].as_str().unwrap_or_default().to_owned();

        if code == RATE_LIMIT_CODE || message.contains(RATE_LIMIT_PHRASE) {
            let message = if message.is_empty() {
                RATE_LIMIT_PHRASE.to_owned()
            } else {
                message
            };
            return Error::RateLimited { message };
        }
        if !message.is_empty() {
            return Error::Unauthorized { message };
        }
    }
    Error::Unauthorized {
        message: "invalid or expired PAT".into(),
    }
}

/// Clip a response body for inclusion in an error message.
fn truncated(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        body.to_owned()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < LIMIT)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &body[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_is_22_chars_urlsafe() {
        let id = ThinqClient::message_id();
        assert_eq!(id.len(), 22);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn message_ids_are_unique_per_call() {
        assert_ne!(ThinqClient::message_id(), ThinqClient::message_id());
    }

    #[test]
    fn rate_limit_code_is_reclassified() {
        let body = r#"{"error":{"code":"1314","message":"Exceeded User API calls"}}"#;
        assert!(matches!(
            classify_unauthorized(body),
            Error::RateLimited { .. }
        ));
    }

    #[test]
    fn rate_limit_phrase_alone_is_reclassified() {
        let body = r#"{"error":{"code":"0000","message":"Exceeded User API calls for app"}}"#;
        assert!(matches!(
            classify_unauthorized(body),
            Error::RateLimited { .. }
        ));
    }

    #[test]
    fn numeric_rate_limit_code_is_reclassified() {
        let body = r#"{"error":{"code":1314,"message":"throttled"}}"#;
        assert!(matches!(
            classify_unauthorized(body),
            Error::RateLimited { .. }
        ));
    }

    #[test]
    fn other_401_codes_stay_unauthorized() {
        let body = r#"{"error":{"code":"9999","message":"denied"}}"#;
        assert!(matches!(
            classify_unauthorized(body),
            Error::Unauthorized { .. }
        ));
    }

    #[test]
    fn non_json_401_body_stays_unauthorized() {
        assert!(matches!(
            classify_unauthorized("<html>forbidden</html>"),
            Error::Unauthorized { .. }
        ));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let auth = HomeAuth {
            server_url: "https://api-kic.lgthinq.com/".parse().unwrap(),
            pat: SecretString::from("token".to_owned()),
            country: "KR".into(),
            client_id: "client".into(),
        };
        let url = endpoint(&auth, "devices").unwrap();
        assert_eq!(url.as_str(), "https://api-kic.lgthinq.com/devices");
    }
}
