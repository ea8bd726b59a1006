use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{Tweet, TweetBody, TweetListResponse};
use super::{ApiError, TweetSource};

const LIST_PATH: &str = "getTweets";
const CREATE_PATH: &str = "addTweet";

/// HTTP client for the tweet API.
///
/// `base_url` is the API root, e.g. `http://localhost:3000/api`; the list and
/// create endpoints are resolved relative to it.
pub struct HttpTweetSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTweetSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "API base URL must be http(s), got {base_url:?}"
            )));
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into `ApiError::Api`, keeping the body as the message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    warn!("Tweet API returned HTTP {}: {}", status.as_u16(), message);
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TweetSource for HttpTweetSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, ApiError> {
        let url = self.endpoint(LIST_PATH);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let parsed: TweetListResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        let tweets = parsed.into_tweets();
        info!("Fetched {} tweets", tweets.len());
        Ok(tweets)
    }

    async fn create_tweet(&self, body: &TweetBody) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(CREATE_PATH);
        debug!("POST {url} (text len={})", body.text.len());

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        let value = serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))?;
        info!("Tweet created by {}", body.username);
        Ok(value)
    }
}
