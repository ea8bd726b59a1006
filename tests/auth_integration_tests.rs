use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chirp::auth::{
    AuthError, BrowserLauncher, GoogleEndpoints, GoogleProvider, GoogleSettings,
    IdentityProvider,
};
use reqwest::Url;
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, body_string_contains, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// base64("test-client:test-secret")
const BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ=";

fn settings_for(server: &MockServer, timeout: Duration) -> GoogleSettings {
    GoogleSettings {
        client_id: Some("test-client".to_string()),
        client_secret: Some("test-secret".to_string()),
        redirect_port: 0,
        callback_timeout: timeout,
        endpoints: GoogleEndpoints {
            authorize_url: format!("{}/o/oauth2/v2/auth", server.uri()),
            token_url: format!("{}/token", server.uri()),
            userinfo_url: format!("{}/userinfo", server.uri()),
            revoke_url: format!("{}/revoke", server.uri()),
        },
    }
}

/// A "browser" that follows the authorize URL straight to the redirect,
/// answering with `code` and either the issued state or `forced_state`.
fn fake_browser(code: &'static str, forced_state: Option<&'static str>) -> BrowserLauncher {
    Arc::new(move |url: &str| -> Result<(), AuthError> {
        let url = Url::parse(url).map_err(|e| AuthError::Browser(e.to_string()))?;
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let redirect_uri = query["redirect_uri"].clone();
        let state = forced_state
            .map(str::to_string)
            .unwrap_or_else(|| query["state"].clone());

        tokio::spawn(async move {
            let mut redirect = Url::parse(&redirect_uri).unwrap();
            redirect
                .query_pairs_mut()
                .append_pair("code", code)
                .append_pair("state", &state);
            let _ = reqwest::get(redirect).await;
        });
        Ok(())
    })
}

async fn mount_token_and_userinfo(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("code_verifier="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-123",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": "openid email profile",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "1234",
            "name": "Ada Lovelace",
            "picture": "https://example.com/ada.png",
            "email": "ada@example.com",
        })))
        .mount(server)
        .await;
}

async fn loopback() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

// ============================================================================
// Individual endpoints
// ============================================================================

#[tokio::test]
async fn test_exchange_code_sends_basic_auth() {
    let server = MockServer::start().await;
    mount_token_and_userinfo(&server).await;
    let provider = GoogleProvider::new(settings_for(&server, Duration::from_secs(5)));

    let token = provider
        .exchange_code("auth-code", "verifier", "http://127.0.0.1:1/callback")
        .await
        .unwrap();
    assert_eq!(token.access_token, "access-123");
    assert_eq!(token.expires_in, Some(3599));
}

#[tokio::test]
async fn test_exchange_code_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;
    let provider = GoogleProvider::new(settings_for(&server, Duration::from_secs(5)));

    let err = provider
        .exchange_code("stale", "verifier", "http://127.0.0.1:1/callback")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AuthError::Provider {
            status: 400,
            message: "invalid_grant".to_string(),
        }
    );
}

#[tokio::test]
async fn test_fetch_session_maps_profile() {
    let server = MockServer::start().await;
    mount_token_and_userinfo(&server).await;
    let provider = GoogleProvider::new(settings_for(&server, Duration::from_secs(5)));

    let session = provider.fetch_session("access-123").await.unwrap();
    assert_eq!(session.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(session.image.as_deref(), Some("https://example.com/ada.png"));
    assert_eq!(session.email.as_deref(), Some("ada@example.com"));
}

// ============================================================================
// Full loopback flow
// ============================================================================

#[tokio::test]
async fn test_sign_in_and_sign_out_round_trip() {
    let server = MockServer::start().await;
    mount_token_and_userinfo(&server).await;
    Mock::given(method("POST"))
        .and(path("/revoke"))
        .and(body_string("token=access-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleProvider::new(settings_for(&server, Duration::from_secs(5)))
        .with_launcher(fake_browser("auth-code", None));

    let session = provider.sign_in_with_listener(loopback().await).await.unwrap();
    assert_eq!(session.display_name(), "Ada Lovelace");

    provider.sign_out().await.unwrap();
    // Token is dropped; a second sign-out has nothing to revoke
    provider.sign_out().await.unwrap();
}

#[tokio::test]
async fn test_sign_in_rejects_state_mismatch() {
    let server = MockServer::start().await;
    mount_token_and_userinfo(&server).await;

    let provider = GoogleProvider::new(settings_for(&server, Duration::from_secs(5)))
        .with_launcher(fake_browser("auth-code", Some("forged")));

    let err = provider
        .sign_in_with_listener(loopback().await)
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::StateMismatch);
}

#[tokio::test]
async fn test_sign_in_times_out_without_redirect() {
    let server = MockServer::start().await;
    let idle: BrowserLauncher = Arc::new(|_: &str| -> Result<(), AuthError> { Ok(()) });
    let provider = GoogleProvider::new(settings_for(&server, Duration::from_millis(200)))
        .with_launcher(idle);

    let err = provider
        .sign_in_with_listener(loopback().await)
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Timeout);
}

#[tokio::test]
async fn test_browser_failure_still_waits_for_redirect() {
    let server = MockServer::start().await;
    let broken: BrowserLauncher =
        Arc::new(|_: &str| -> Result<(), AuthError> {
            Err(AuthError::Browser("no display".to_string()))
        });
    let provider = GoogleProvider::new(settings_for(&server, Duration::from_millis(200)))
        .with_launcher(broken);

    let err = provider
        .sign_in_with_listener(loopback().await)
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Timeout);
}
