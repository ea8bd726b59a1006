//! # Authentication
//!
//! One external identity provider (Google OAuth 2.0) behind the
//! [`IdentityProvider`] trait. The provider produces a read-only [`Session`]
//! projection; the app holds it in a [`SessionState`] and passes it to the
//! components that need it.
//!
//! ```text
//! Anonymous ──sign_in()──▶ Authenticated(Session)
//!     ▲                           │
//!     └────────sign_out()─────────┘
//! ```

pub mod callback;
pub mod google;
pub mod pkce;

use std::fmt;

use async_trait::async_trait;

pub use google::{BrowserLauncher, GoogleEndpoints, GoogleProvider, GoogleSettings};

/// What the client knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub name: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
}

impl Session {
    /// Name to show in the UI: display name, then email, then a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(crate::api::FALLBACK_USERNAME)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn current(&self) -> Option<&Session> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(session) => Some(session),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Errors from the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Missing client id / secret or an unusable endpoint.
    Config(String),
    /// Transport failure talking to the provider.
    Network(String),
    /// The provider answered with a non-success status.
    Provider { status: u16, message: String },
    /// The redirect carried an error or no authorization code.
    Callback(String),
    /// The redirect's `state` does not match the one we issued.
    StateMismatch,
    /// No redirect arrived before the callback timeout.
    Timeout,
    /// The system browser could not be launched.
    Browser(String),
    /// A provider response could not be decoded.
    Parse(String),
    /// Local listener I/O failed.
    Io(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Config(msg) => write!(f, "auth config error: {msg}"),
            AuthError::Network(msg) => write!(f, "auth network error: {msg}"),
            AuthError::Provider { status, message } => {
                write!(f, "identity provider error (HTTP {status}): {message}")
            }
            AuthError::Callback(msg) => write!(f, "sign-in callback error: {msg}"),
            AuthError::StateMismatch => write!(f, "sign-in state mismatch"),
            AuthError::Timeout => write!(f, "timed out waiting for sign-in"),
            AuthError::Browser(msg) => write!(f, "could not open browser: {msg}"),
            AuthError::Parse(msg) => write!(f, "auth parse error: {msg}"),
            AuthError::Io(msg) => write!(f, "auth I/O error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Runs the provider's sign-in flow to completion.
    async fn sign_in(&self) -> Result<Session, AuthError>;

    /// Ends the provider-side session. Local credentials are dropped even
    /// when this returns an error.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
