//! # Composer
//!
//! Draft state for a new tweet: the text, an optional attached image URL
//! and the image-URL entry form.

use crate::api::TweetBody;
use crate::auth::SessionState;

pub const PLACEHOLDER_SIGNED_OUT: &str = "Sign In to Tweet!";
pub const PLACEHOLDER_SIGNED_IN: &str = "What's Happening?";
pub const IMAGE_PLACEHOLDER: &str = "Enter image Url...";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    /// Attached image URL.
    pub image: Option<String>,
    pub image_form_open: bool,
    /// Contents of the image-URL form before it is committed.
    pub image_draft: String,
    /// A create request is in flight.
    pub posting: bool,
}

impl Composer {
    /// Submit is enabled only with non-blank text, a session, and no post in flight.
    pub fn can_submit(&self, session: &SessionState) -> bool {
        !self.text.trim().is_empty() && session.is_authenticated() && !self.posting
    }

    pub fn placeholder(session: &SessionState) -> &'static str {
        if session.is_authenticated() {
            PLACEHOLDER_SIGNED_IN
        } else {
            PLACEHOLDER_SIGNED_OUT
        }
    }

    pub fn toggle_image_form(&mut self) {
        self.image_form_open = !self.image_form_open;
    }

    /// Attaches the drafted image URL and closes the form.
    ///
    /// A blank draft is a no-op; the form stays as it is.
    pub fn attach_image(&mut self) -> bool {
        let url = self.image_draft.trim();
        if url.is_empty() {
            return false;
        }
        self.image = Some(url.to_string());
        self.image_draft.clear();
        self.image_form_open = false;
        true
    }

    /// Builds the create payload, or `None` when submit is disabled.
    pub fn build_body(&self, session: &SessionState) -> Option<TweetBody> {
        if !self.can_submit(session) {
            return None;
        }
        let author = session.current();
        Some(TweetBody::new(
            self.text.clone(),
            self.image.clone(),
            author.and_then(|s| s.name.as_deref()),
            author.and_then(|s| s.image.as_deref()),
        ))
    }

    /// Clears all inputs and closes the image form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
