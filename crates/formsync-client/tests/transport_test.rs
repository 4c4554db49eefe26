//! Wire envelope handling and the HTTP transport without the network feature.

use std::time::Duration;

use formsync_client::transport::protocol::{ApiRequest, ApiResponse};
use formsync_client::{HttpClientConfig, HttpTransport};
use formsync_core::config::SyncConfig;
use formsync_core::constants::PROTOCOL_VERSION;
use formsync_core::errors::{FormSyncError, TransportError};

#[test]
fn request_envelope_carries_version_and_id() {
    let a = ApiRequest::new(1);
    let b = ApiRequest::new(2);
    assert_eq!(a.version, PROTOCOL_VERSION);
    assert_ne!(a.request_id, b.request_id);
}

#[test]
fn successful_response_yields_data() {
    let response = ApiResponse::ok("r1".to_string(), vec![1, 2, 3]);
    assert_eq!(response.into_data(200).unwrap(), vec![1, 2, 3]);
}

#[test]
fn failed_response_maps_to_status_error() {
    let response: ApiResponse<()> = ApiResponse::err("r1".to_string(), "boom".to_string());
    match response.into_data(500) {
        Err(FormSyncError::TransportError(TransportError::Status { status, body })) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn major_version_mismatch_is_refused() {
    let mut response = ApiResponse::ok(String::new(), 1);
    response.version = "2.0".to_string();
    assert!(matches!(
        response.into_data(200),
        Err(FormSyncError::TransportError(TransportError::VersionMismatch { .. }))
    ));
}

#[test]
fn minor_version_difference_is_accepted() {
    let body = r#"{"version":"1.7","success":true,"data":42,"extra":"ignored"}"#;
    let response: ApiResponse<u32> = serde_json::from_str(body).unwrap();
    assert_eq!(response.into_data(200).unwrap(), 42);
}

#[test]
fn missing_data_is_a_decode_error() {
    let body = r#"{"version":"1.0","success":true}"#;
    let response: ApiResponse<u32> = serde_json::from_str(body).unwrap();
    assert!(matches!(
        response.into_data(200),
        Err(FormSyncError::TransportError(TransportError::Decode { .. }))
    ));
}

#[test]
fn client_config_comes_from_sync_config() {
    let sync = SyncConfig {
        base_url: "https://forms.example.org/".to_string(),
        ..SyncConfig::default()
    };
    let config = HttpClientConfig::from(&sync);
    assert_eq!(config.base_url, "https://forms.example.org");
    assert!(config.timeout > Duration::ZERO);
}

#[cfg(not(feature = "remote"))]
#[tokio::test]
async fn without_remote_feature_every_call_is_retryable() {
    use formsync_core::traits::SubmissionTransport;

    let mut transport = HttpTransport::new(HttpClientConfig::default()).unwrap();
    transport.set_bearer_token("token".to_string());

    let err = transport.fetch_forms().await.unwrap_err();
    assert!(err.is_retryable());
    let err = transport
        .submit(formsync_core::models::SubmitRequest::Batch(Vec::new()))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
