//! Integration tests for the account client
//!
//! These tests use wiremock to stand in for the Circely service and exercise
//! the full request/response cycle, error handling, and retry behavior.

use circely_api::http::{ApiClient, ApiClientConfig};
use circely_api::{AccountApi, AccountClient, AccountProfile, ChangePasswordParams};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AccountClient {
    let config = ApiClientConfig::new(server.uri());
    AccountClient::new(ApiClient::new(config))
}

fn alex_profile() -> AccountProfile {
    AccountProfile {
        username: "Alex Mercer".to_string(),
        email: "alex@circley.com".to_string(),
        date_joined: "Jan 12, 2024".to_string(),
    }
}

// =============================================================================
// Profile Query Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_profile_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "Alex Mercer",
            "email": "alex@circley.com",
            "dateJoined": "Jan 12, 2024"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let profile = client.fetch_profile().await.unwrap();

    assert_eq!(profile, alex_profile());
}

#[tokio::test]
async fn test_fetch_profile_retries_server_errors() {
    let mock_server = MockServer::start().await;

    // First request fails with 503
    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": "ServiceUnavailable",
            "message": "Temporarily unavailable"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    // Subsequent requests succeed
    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "Alex Mercer",
            "email": "alex@circley.com",
            "dateJoined": "Jan 12, 2024"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let profile = client.fetch_profile().await.unwrap();

    assert_eq!(profile.username, "Alex Mercer");
}

#[tokio::test]
async fn test_fetch_profile_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Unauthorized",
            "message": "Not signed in"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.fetch_profile().await.unwrap_err();

    assert_eq!(error.status(), 401);
    assert!(!error.is_recoverable());
}

// =============================================================================
// Change Password Tests
// =============================================================================

#[tokio::test]
async fn test_change_password_success_with_empty_body() {
    let mock_server = MockServer::start().await;

    let params = ChangePasswordParams {
        old_password: "hunter2".to_string(),
        new_password: "correct horse".to_string(),
        confirm_password: "correct horse".to_string(),
    };

    // The service replies 200 with no body
    Mock::given(method("POST"))
        .and(path("/api/account/password/"))
        .and(body_json(serde_json::json!({
            "oldPassword": "hunter2",
            "newPassword": "correct horse",
            "confirmPassword": "correct horse"
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.change_password(&params).await.unwrap();
}

#[tokio::test]
async fn test_change_password_wrong_current_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/account/password/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Current password is incorrect"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = ChangePasswordParams {
        old_password: "wrong".to_string(),
        new_password: "new".to_string(),
        confirm_password: "new".to_string(),
    };

    let error = client.change_password(&params).await.unwrap_err();

    assert_eq!(error.status(), 400);
    assert_eq!(error.error(), "ErrorResponse");
    assert_eq!(error.message(), "Current password is incorrect");
}

#[tokio::test]
async fn test_change_password_not_retried() {
    let mock_server = MockServer::start().await;

    // Should only be called once even though 503 is a retryable status
    Mock::given(method("POST"))
        .and(path("/api/account/password/"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": "ServiceUnavailable",
            "message": "Temporarily unavailable"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = ChangePasswordParams {
        old_password: "a".to_string(),
        new_password: "b".to_string(),
        confirm_password: "b".to_string(),
    };

    let error = client.change_password(&params).await.unwrap_err();
    assert_eq!(error.status(), 503);
}

// =============================================================================
// Error Body Tests
// =============================================================================

#[tokio::test]
async fn test_error_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.fetch_profile().await.unwrap_err();

    assert_eq!(error.status(), 502);
    assert_eq!(error.error(), "Unknown");
    assert!(error.message().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_malformed_profile_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.fetch_profile().await.unwrap_err();

    assert_eq!(error.error(), "ParseError");
    assert!(error.message().contains("Failed to parse JSON"));
}
