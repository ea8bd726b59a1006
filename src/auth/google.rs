//! Google OAuth 2.0 provider (authorization code + PKCE, loopback redirect).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use log::{debug, info, warn};
use reqwest::Url;
use serde::Deserialize;
use tokio::net::TcpListener;

use super::callback::{self, CALLBACK_PATH};
use super::pkce::{self, Pkce};
use super::{AuthError, IdentityProvider, Session};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
pub const DEFAULT_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

const SCOPES: &str = "openid email profile";

/// Opens the authorization URL for the user. Replaceable for tests.
pub type BrowserLauncher = Arc<dyn Fn(&str) -> Result<(), AuthError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub revoke_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            userinfo_url: DEFAULT_USERINFO_URL.to_string(),
            revoke_url: DEFAULT_REVOKE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Loopback port for the redirect; 0 picks a free port.
    pub redirect_port: u16,
    pub callback_timeout: Duration,
    pub endpoints: GoogleEndpoints,
}

/// Authorization URL plus the secrets needed to finish the flow.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
}

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UserInfo {
    sub: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    email: Option<String>,
}

pub struct GoogleProvider {
    settings: GoogleSettings,
    http: reqwest::Client,
    launcher: BrowserLauncher,
    access_token: Mutex<Option<String>>,
}

fn system_browser(url: &str) -> Result<(), AuthError> {
    open::that(url).map_err(|e| AuthError::Browser(e.to_string()))
}

impl GoogleProvider {
    pub fn new(settings: GoogleSettings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
            launcher: Arc::new(system_browser),
            access_token: Mutex::new(None),
        }
    }

    pub fn with_launcher(mut self, launcher: BrowserLauncher) -> Self {
        self.launcher = launcher;
        self
    }

    fn credentials(&self) -> Result<(&str, &str), AuthError> {
        let id = self.settings.client_id.as_deref().filter(|s| !s.is_empty());
        let secret = self
            .settings
            .client_secret
            .as_deref()
            .filter(|s| !s.is_empty());
        match (id, secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AuthError::Config(
                "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set (env or [auth] in config)"
                    .to_string(),
            )),
        }
    }

    /// Builds the authorization URL for the given redirect URI.
    pub fn authorize_request(&self, redirect_uri: &str) -> Result<AuthorizeRequest, AuthError> {
        let (client_id, _) = self.credentials()?;
        let state = pkce::generate_state();
        let pkce = Pkce::generate();

        let url = Url::parse_with_params(
            &self.settings.endpoints.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("scope", SCOPES),
                ("state", state.as_str()),
                ("code_challenge", pkce.challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| AuthError::Config(format!("bad authorize URL: {e}")))?;

        Ok(AuthorizeRequest {
            url: url.to_string(),
            state,
            code_verifier: pkce.verifier,
        })
    }

    /// Exchanges an authorization code for tokens (HTTP Basic client auth).
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AuthError> {
        let (client_id, client_secret) = self.credentials()?;
        let auth_header = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(format!("{client_id}:{client_secret}"))
        );

        let params = [
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ];

        let resp = self
            .http
            .post(&self.settings.endpoints.token_url)
            .header("Authorization", auth_header)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        debug!(
            "Token exchange succeeded (expires_in={:?}, refresh_token={})",
            token.expires_in,
            token.refresh_token.is_some()
        );
        Ok(token)
    }

    /// Fetches the user's profile and projects it into a `Session`.
    pub async fn fetch_session(&self, access_token: &str) -> Result<Session, AuthError> {
        let resp = self
            .http
            .get(&self.settings.endpoints.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let resp = check_status(resp).await?;

        let info: UserInfo = resp
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        debug!("Userinfo received for sub={:?}", info.sub);

        Ok(Session {
            name: info.name,
            image: info.picture,
            email: info.email,
        })
    }

    /// Revokes a token at the provider.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let resp = self
            .http
            .post(&self.settings.endpoints.revoke_url)
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    /// Runs the flow against an already-bound loopback listener.
    pub async fn sign_in_with_listener(&self, listener: TcpListener) -> Result<Session, AuthError> {
        let port = listener
            .local_addr()
            .map_err(|e| AuthError::Io(e.to_string()))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{port}{CALLBACK_PATH}");
        let request = self.authorize_request(&redirect_uri)?;

        info!("Opening browser for Google sign-in: {}", request.url);
        if let Err(e) = (self.launcher)(&request.url) {
            warn!("{e}; open the URL from the log manually");
        }

        let params = tokio::time::timeout(
            self.settings.callback_timeout,
            callback::await_callback(listener),
        )
        .await
        .map_err(|_| AuthError::Timeout)??;

        if params.state != request.state {
            warn!("OAuth state mismatch, discarding redirect");
            return Err(AuthError::StateMismatch);
        }

        let token = self
            .exchange_code(&params.code, &request.code_verifier, &redirect_uri)
            .await?;
        let session = self.fetch_session(&token.access_token).await?;

        if let Ok(mut held) = self.access_token.lock() {
            *held = Some(token.access_token);
        }
        info!("Signed in as {}", session.display_name());
        Ok(session)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(AuthError::Provider {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn sign_in(&self) -> Result<Session, AuthError> {
        // Fail on missing credentials before binding anything
        self.credentials()?;

        let listener = TcpListener::bind(("127.0.0.1", self.settings.redirect_port))
            .await
            .map_err(|e| {
                AuthError::Io(format!(
                    "cannot listen on port {}: {e}",
                    self.settings.redirect_port
                ))
            })?;
        self.sign_in_with_listener(listener).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = match self.access_token.lock() {
            Ok(mut held) => held.take(),
            Err(_) => None,
        };

        match token {
            Some(token) => {
                info!("Revoking Google access token");
                self.revoke(&token).await
            }
            None => {
                debug!("Sign-out without a held token; nothing to revoke");
                Ok(())
            }
        }
    }
}
