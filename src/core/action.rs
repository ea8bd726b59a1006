//! # Actions
//!
//! Everything that can happen in chirp becomes an `Action`.
//! User presses Enter in the composer? That's `Action::SubmitTweet`.
//! The list endpoint answers? That's `Action::FeedLoaded { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! adapter must carry out (a remote call, quitting). No I/O happens here;
//! the result of an effect comes back later as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                              │
//!              Action  ◀── tasks::perform() ◀──┘
//! ```

use log::{debug, info, warn};

use crate::api::{ApiError, Tweet, TweetBody};
use crate::auth::{AuthError, Session, SessionState};
use crate::core::feed::RefreshOrigin;
use crate::core::notice::NoticeKind;
use crate::core::sidebar::SidebarAction;
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// Re-fetch the whole feed.
    Refresh(RefreshOrigin),
    /// A list fetch finished.
    FeedLoaded {
        generation: u64,
        result: Result<Vec<Tweet>, ApiError>,
    },
    /// Composer text changed.
    EditText(String),
    /// Image-URL form text changed.
    EditImageDraft(String),
    ToggleImageForm,
    /// Commit the image-URL form.
    AttachImage,
    SubmitTweet,
    /// A create request finished.
    TweetPosted(Result<serde_json::Value, ApiError>),
    SignIn,
    SignedIn(Result<Session, AuthError>),
    SignOut,
    SignedOut(Result<(), AuthError>),
    /// A sidebar row was activated.
    Activate(SidebarAction),
    DismissNotice(u64),
    Quit,
}

/// Side effect requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchFeed { generation: u64 },
    CreateTweet(TweetBody),
    SignIn,
    SignOut,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Refresh(origin) => start_refresh(app, origin),

        Action::FeedLoaded { generation, result } => {
            match result {
                Ok(tweets) => {
                    let count = tweets.len();
                    if app.feed.commit(generation, tweets) {
                        info!("Feed replaced with {count} tweets (generation {generation})");
                        // Confirm in place only if our notice is still up
                        if let Some(id) = app.refresh_notice.take() {
                            app.notices.replace(id, NoticeKind::Success, "Feed Updated!");
                        }
                    } else {
                        debug!("Discarding stale feed response (generation {generation})");
                    }
                }
                Err(e) => {
                    if app.feed.fail(generation) {
                        warn!("Feed refresh failed: {e}");
                        let message = format!("Refresh failed: {e}");
                        let notice = app.refresh_notice.take();
                        show_replacing(app, notice, NoticeKind::Error, message);
                    } else {
                        debug!("Ignoring stale feed failure (generation {generation}): {e}");
                    }
                }
            }
            Effect::None
        }

        Action::EditText(text) => {
            app.composer.text = text;
            Effect::None
        }

        Action::EditImageDraft(text) => {
            app.composer.image_draft = text;
            Effect::None
        }

        Action::ToggleImageForm => {
            app.composer.toggle_image_form();
            Effect::None
        }

        Action::AttachImage => {
            if app.composer.attach_image() {
                debug!("Image attached to draft");
            }
            Effect::None
        }

        Action::SubmitTweet => match app.composer.build_body(&app.session) {
            Some(body) => {
                info!("Posting tweet ({} chars)", body.text.chars().count());
                app.composer.posting = true;
                Effect::CreateTweet(body)
            }
            None => {
                debug!("Submit ignored: composer disabled");
                Effect::None
            }
        },

        Action::TweetPosted(result) => match result {
            Ok(_) => {
                app.composer.reset();
                app.notices.success("Tweet Posted");
                start_refresh(app, RefreshOrigin::AfterPost)
            }
            Err(e) => {
                warn!("Posting tweet failed: {e}");
                app.composer.posting = false;
                app.notices.error(format!("Tweet failed: {e}"));
                Effect::None
            }
        },

        Action::SignIn => {
            if app.auth_pending || app.session.is_authenticated() {
                return Effect::None;
            }
            app.auth_pending = true;
            app.auth_notice = Some(app.notices.loading("Signing in..."));
            Effect::SignIn
        }

        Action::SignedIn(result) => {
            app.auth_pending = false;
            let notice = app.auth_notice.take();
            match result {
                Ok(session) => {
                    let message = format!("Signed in as {}", session.display_name());
                    app.session = SessionState::Authenticated(session);
                    show_replacing(app, notice, NoticeKind::Success, message);
                }
                Err(e) => {
                    warn!("Sign-in failed: {e}");
                    show_replacing(app, notice, NoticeKind::Error, format!("Sign-in failed: {e}"));
                }
            }
            Effect::None
        }

        Action::SignOut => {
            if app.auth_pending || !app.session.is_authenticated() {
                return Effect::None;
            }
            app.auth_pending = true;
            Effect::SignOut
        }

        Action::SignedOut(result) => {
            app.auth_pending = false;
            app.session = SessionState::Anonymous;
            match result {
                Ok(()) => {
                    app.notices.success("Signed out");
                }
                Err(e) => {
                    warn!("Sign-out incomplete: {e}");
                    app.notices.error(format!("Signed out locally; {e}"));
                }
            }
            Effect::None
        }

        Action::Activate(sidebar_action) => match sidebar_action {
            SidebarAction::None => Effect::None,
            SidebarAction::Refresh => update(app, Action::Refresh(RefreshOrigin::Manual)),
            SidebarAction::SignIn => update(app, Action::SignIn),
            SidebarAction::SignOut => update(app, Action::SignOut),
        },

        Action::DismissNotice(id) => {
            app.notices.dismiss(id);
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

fn start_refresh(app: &mut App, origin: RefreshOrigin) -> Effect {
    let generation = app.feed.begin_refresh();
    // A pending sign-in keeps its loading notice
    if origin == RefreshOrigin::Manual && app.refresh_notice.is_none() && !app.notices.is_loading()
    {
        app.refresh_notice = Some(app.notices.loading("Refreshing..."));
    }
    info!("Refreshing feed ({origin:?}, generation {generation})");
    Effect::FetchFeed { generation }
}

/// Turns the notice `id` into the outcome, or shows it fresh if that notice
/// is gone.
fn show_replacing(app: &mut App, id: Option<u64>, kind: NoticeKind, message: String) {
    let replaced = id.is_some_and(|id| app.notices.replace(id, kind, message.clone()));
    if !replaced {
        app.notices.show(kind, message);
    }
}
