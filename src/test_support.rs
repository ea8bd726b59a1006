//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;

use crate::api::{ApiError, Tweet, TweetBody, TweetSource};
use crate::auth::{AuthError, IdentityProvider, Session, SessionState};
use crate::core::state::App;

/// A canned tweet source that records what it was asked to do.
pub struct StubSource {
    pub tweets: Mutex<Result<Vec<Tweet>, ApiError>>,
    pub create_result: Mutex<Result<serde_json::Value, ApiError>>,
    pub created: Mutex<Vec<TweetBody>>,
    pub list_calls: Mutex<usize>,
}

impl StubSource {
    pub fn with_tweets(tweets: Vec<Tweet>) -> Self {
        Self {
            tweets: Mutex::new(Ok(tweets)),
            create_result: Mutex::new(Ok(serde_json::json!({ "ok": true }))),
            created: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
        }
    }

    pub fn failing_create(self, err: ApiError) -> Self {
        *self.create_result.lock().unwrap() = Err(err);
        self
    }
}

#[async_trait]
impl TweetSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, ApiError> {
        *self.list_calls.lock().unwrap() += 1;
        self.tweets.lock().unwrap().clone()
    }

    async fn create_tweet(&self, body: &TweetBody) -> Result<serde_json::Value, ApiError> {
        self.created.lock().unwrap().push(body.clone());
        self.create_result.lock().unwrap().clone()
    }
}

/// An identity provider that answers immediately.
pub struct StubIdentity {
    pub sign_in_result: Result<Session, AuthError>,
    pub sign_out_result: Result<(), AuthError>,
}

impl StubIdentity {
    pub fn succeeding(name: &str) -> Self {
        Self {
            sign_in_result: Ok(session(name)),
            sign_out_result: Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    fn name(&self) -> &str {
        "stub"
    }

    async fn sign_in(&self) -> Result<Session, AuthError> {
        self.sign_in_result.clone()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_result.clone()
    }
}

/// A tweet with a fixed timestamp.
pub fn tweet(id: &str, text: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        text: text.to_string(),
        username: "tester".to_string(),
        profile_img: "https://example.com/tester.png".to_string(),
        image: None,
    }
}

pub fn session(name: &str) -> Session {
    Session {
        name: Some(name.to_string()),
        image: Some(format!("https://example.com/{name}.png")),
        email: Some(format!("{name}@example.com")),
    }
}

pub fn signed_in(name: &str) -> SessionState {
    SessionState::Authenticated(session(name))
}

pub fn test_app() -> App {
    App::new()
}

pub fn signed_in_app(name: &str) -> App {
    let mut app = App::new();
    app.session = signed_in(name);
    app
}
