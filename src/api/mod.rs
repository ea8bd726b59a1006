//! # Tweet API
//!
//! Client side of the remote data API: list tweets, create a tweet.
//! The rest of the app talks to it through the [`TweetSource`] trait so
//! tests can swap in a stub.

pub mod client;
pub mod types;

use std::fmt;

use async_trait::async_trait;

pub use client::HttpTweetSource;
pub use types::{FALLBACK_PROFILE_IMG, FALLBACK_USERNAME, Tweet, TweetBody};

/// Errors from the remote data API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client misconfigured (bad base URL).
    Config(String),
    /// Transport failure (DNS, connection refused, timeout).
    Network(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetches the full tweet list, in the order the remote returns it.
    async fn list_tweets(&self) -> Result<Vec<Tweet>, ApiError>;

    /// Creates a tweet. The result is passed through uninterpreted.
    async fn create_tweet(&self, body: &TweetBody) -> Result<serde_json::Value, ApiError>;
}
