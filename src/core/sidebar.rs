//! Sidebar rows. Fixed list; only the last row depends on the session.

use crate::auth::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarIcon {
    Home,
    Hashtag,
    Bell,
    Mail,
    Bookmark,
    Collection,
    User,
}

/// What activating a row does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    /// Inert row.
    None,
    Refresh,
    SignIn,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarRow {
    pub label: &'static str,
    pub icon: SidebarIcon,
    pub action: SidebarAction,
}

const STATIC_ROWS: [SidebarRow; 6] = [
    SidebarRow {
        label: "Home",
        icon: SidebarIcon::Home,
        action: SidebarAction::Refresh,
    },
    SidebarRow {
        label: "Explore",
        icon: SidebarIcon::Hashtag,
        action: SidebarAction::None,
    },
    SidebarRow {
        label: "Notifications",
        icon: SidebarIcon::Bell,
        action: SidebarAction::None,
    },
    SidebarRow {
        label: "Messages",
        icon: SidebarIcon::Mail,
        action: SidebarAction::None,
    },
    SidebarRow {
        label: "Bookmarks",
        icon: SidebarIcon::Bookmark,
        action: SidebarAction::None,
    },
    SidebarRow {
        label: "Lists",
        icon: SidebarIcon::Collection,
        action: SidebarAction::None,
    },
];

pub const ROW_COUNT: usize = STATIC_ROWS.len() + 1;

/// The sidebar rows for the given session, in display order.
pub fn rows(session: &SessionState) -> Vec<SidebarRow> {
    let auth_row = if session.is_authenticated() {
        SidebarRow {
            label: "Sign Out",
            icon: SidebarIcon::User,
            action: SidebarAction::SignOut,
        }
    } else {
        SidebarRow {
            label: "Sign In",
            icon: SidebarIcon::User,
            action: SidebarAction::SignIn,
        }
    };

    let mut rows = STATIC_ROWS.to_vec();
    rows.push(auth_row);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::signed_in;

    #[test]
    fn test_row_order_is_fixed() {
        let labels: Vec<_> = rows(&SessionState::Anonymous)
            .iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Home",
                "Explore",
                "Notifications",
                "Messages",
                "Bookmarks",
                "Lists",
                "Sign In"
            ]
        );
        assert_eq!(labels.len(), ROW_COUNT);
    }

    #[test]
    fn test_auth_row_follows_session() {
        let last = *rows(&signed_in("Ada")).last().unwrap();
        assert_eq!(last.label, "Sign Out");
        assert_eq!(last.action, SidebarAction::SignOut);

        let last = *rows(&SessionState::Anonymous).last().unwrap();
        assert_eq!(last.label, "Sign In");
        assert_eq!(last.action, SidebarAction::SignIn);
    }

    #[test]
    fn test_only_home_and_auth_rows_act() {
        let active: Vec<_> = rows(&SessionState::Anonymous)
            .into_iter()
            .filter(|r| r.action != SidebarAction::None)
            .map(|r| r.label)
            .collect();
        assert_eq!(active, vec!["Home", "Sign In"]);
    }
}
