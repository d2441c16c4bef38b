// Integration tests for `ThinqClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thinqly_api::{Error, HomeAuth, ThinqClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ThinqClient, HomeAuth) {
    let server = MockServer::start().await;
    let client = ThinqClient::from_reqwest(reqwest::Client::new());
    let auth = HomeAuth {
        server_url: server.uri().parse().unwrap(),
        pat: SecretString::from("test-pat".to_owned()),
        country: "KR".into(),
        client_id: "team-dashboard".into(),
    };
    (server, client, auth)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_unwraps_envelope() {
    let (server, client, auth) = setup().await;

    let body = json!({
        "response": [
            {
                "deviceId": "dev-1",
                "deviceInfo": {
                    "alias": "Living room AC",
                    "modelName": "RAC_056905",
                    "deviceType": "DEVICE_AIR_CONDITIONER"
                }
            },
            { "deviceId": "dev-2" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", "Bearer test-pat"))
        .and(header("x-country", "KR"))
        .and(header("x-client-id", "team-dashboard"))
        .and(header_exists("x-message-id"))
        .and(header_exists("x-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = client.list_devices(&auth).await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_id, "dev-1");
    assert_eq!(devices[0].device_info.alias.as_deref(), Some("Living room AC"));
    assert_eq!(
        devices[0].device_info.device_type.as_deref(),
        Some("DEVICE_AIR_CONDITIONER")
    );
    // Bare descriptor: deviceInfo defaults in.
    assert_eq!(devices[1].device_id, "dev-2");
    assert!(devices[1].device_info.alias.is_none());
}

#[tokio::test]
async fn test_get_device_state() {
    let (server, client, auth) = setup().await;

    let body = json!({
        "response": {
            "runState": { "currentState": "RUNNING" },
            "timer": { "remainHour": 1, "remainMinute": 5 }
        }
    });

    Mock::given(method("GET"))
        .and(path("/devices/dev-1/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let state = client.get_device_state(&auth, "dev-1").await.unwrap();
    assert_eq!(state["runState"]["currentState"], "RUNNING");
}

#[tokio::test]
async fn test_missing_envelope_degrades_to_empty() {
    let (server, client, auth) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let devices = client.list_devices(&auth).await.unwrap();
    assert!(devices.is_empty());
}

// ── Failure classification ──────────────────────────────────────────

#[tokio::test]
async fn test_401_with_rate_limit_code_classifies_as_rate_limited() {
    let (server, client, auth) = setup().await;

    let body = json!({"error": {"code": "1314", "message": "Exceeded User API calls"}});
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client.list_devices(&auth).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_401_with_other_code_classifies_as_unauthorized() {
    let (server, client, auth) = setup().await;

    let body = json!({"error": {"code": "9999", "message": "denied"}});
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client.list_devices(&auth).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_401_with_non_json_body_classifies_as_unauthorized() {
    let (server, client, auth) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.list_devices(&auth).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_500_classifies_as_api_error() {
    let (server, client, auth) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/dev-1/state"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.get_device_state(&auth, "dev-1").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_on_success_is_deserialization_error() {
    let (server, client, auth) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_devices(&auth).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}
