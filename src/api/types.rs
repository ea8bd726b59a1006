use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Author name sent when the session has no display name.
pub const FALLBACK_USERNAME: &str = "Unknown";
/// Avatar sent when the session has no profile picture.
pub const FALLBACK_PROFILE_IMG: &str = "https://links.papareact.com/gll";

/// A tweet as stored by the remote API.
///
/// Field names on the wire follow the remote store (`_id`, `_createdAt`,
/// `profileImg`). Tweets are never mutated by the client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tweet {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub username: String,
    #[serde(rename = "profileImg", default)]
    pub profile_img: String,
    /// Attached image URL. The remote stores "no image" as an empty string.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Payload of the create-tweet endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TweetBody {
    pub text: String,
    pub username: String,
    #[serde(rename = "profileImg")]
    pub profile_img: String,
    /// Image URL, or the empty string when nothing is attached.
    pub image: String,
}

impl TweetBody {
    /// Builds a payload, substituting the fallback author fields for any the
    /// session does not provide.
    pub fn new(
        text: String,
        image: Option<String>,
        username: Option<&str>,
        profile_img: Option<&str>,
    ) -> Self {
        Self {
            text,
            username: username.unwrap_or(FALLBACK_USERNAME).to_string(),
            profile_img: profile_img.unwrap_or(FALLBACK_PROFILE_IMG).to_string(),
            image: image.unwrap_or_default(),
        }
    }
}

/// The list endpoint wraps its result in `{"tweets": [...]}`; a bare array
/// is accepted as well.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum TweetListResponse {
    Wrapped { tweets: Vec<Tweet> },
    Bare(Vec<Tweet>),
}

impl TweetListResponse {
    pub(crate) fn into_tweets(self) -> Vec<Tweet> {
        match self {
            TweetListResponse::Wrapped { tweets } => tweets,
            TweetListResponse::Bare(tweets) => tweets,
        }
    }
}
