//! # Effect Execution
//!
//! Runs the remote calls `update()` asks for and turns their results back
//! into actions. The TUI spawns one task per effect; tests drive the same
//! code synchronously through [`dispatch`].

use log::{info, warn};
use std::sync::Arc;

use crate::api::TweetSource;
use crate::auth::IdentityProvider;
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;

/// The remote collaborators effects are executed against.
#[derive(Clone)]
pub struct Services {
    pub source: Arc<dyn TweetSource>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl Services {
    pub fn new(source: Arc<dyn TweetSource>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { source, identity }
    }
}

/// Carries out one effect. Returns the action describing its outcome, or
/// `None` for effects with nothing to report.
pub async fn perform(effect: Effect, services: &Services) -> Option<Action> {
    match effect {
        Effect::None | Effect::Quit => None,
        Effect::FetchFeed { generation } => {
            let result = services.source.list_tweets().await;
            if let Err(e) = &result {
                warn!("{} list failed: {e}", services.source.name());
            }
            Some(Action::FeedLoaded { generation, result })
        }
        Effect::CreateTweet(body) => {
            let result = services.source.create_tweet(&body).await;
            if result.is_ok() {
                info!("{} accepted new tweet", services.source.name());
            }
            Some(Action::TweetPosted(result))
        }
        Effect::SignIn => {
            info!("Starting sign-in with {}", services.identity.name());
            Some(Action::SignedIn(services.identity.sign_in().await))
        }
        Effect::SignOut => {
            info!("Signing out of {}", services.identity.name());
            Some(Action::SignedOut(services.identity.sign_out().await))
        }
    }
}

/// Applies `action` and then every follow-up effect, in order, until the
/// chain settles. Returns the final effect (`Effect::None` or `Effect::Quit`).
pub async fn dispatch(app: &mut App, action: Action, services: &Services) -> Effect {
    let mut effect = update(app, action);
    loop {
        if matches!(effect, Effect::None | Effect::Quit) {
            return effect;
        }
        match perform(effect, services).await {
            Some(next) => effect = update(app, next),
            None => return Effect::None,
        }
    }
}
