//! # Application State
//!
//! Core business state for chirp. Domain data only; presentation state
//! (focus, scroll offsets, cursor positions) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionState        // Anonymous | Authenticated(Session)
//! ├── feed: Feed                   // tweets + refresh generations
//! ├── composer: Composer           // draft text, image, form state
//! ├── notices: Notices             // transient toast slot
//! ├── auth_pending: bool           // sign-in/out round trip in flight
//! ├── refresh_notice: Option<u64>  // loading notice owned by a manual refresh
//! └── auth_notice: Option<u64>     // loading notice owned by sign-in
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::auth::SessionState;
use crate::core::composer::Composer;
use crate::core::feed::Feed;
use crate::core::notice::Notices;
use crate::core::sidebar::{self, SidebarRow};

#[derive(Debug, Default)]
pub struct App {
    pub session: SessionState,
    pub feed: Feed,
    pub composer: Composer,
    pub notices: Notices,
    pub auth_pending: bool,
    pub refresh_notice: Option<u64>,
    pub auth_notice: Option<u64>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        self.composer.can_submit(&self.session)
    }

    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        sidebar::rows(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(!app.session.is_authenticated());
        assert!(app.feed.tweets().is_empty());
        assert!(app.notices.current().is_none());
        assert!(!app.can_submit());
        assert_eq!(app.sidebar_rows().last().unwrap().label, "Sign In");
    }
}
