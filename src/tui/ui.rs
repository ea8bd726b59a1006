use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ComposerHit, ComposerLayout, ComposerPanel, FeedList, SIDEBAR_WIDTH, Sidebar, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Top-level screen regions.
///
/// ```text
/// ┌──────────┬───────────────────────────┐
/// │          │ title                     │
/// │ sidebar  ├───────────────────────────┤
/// │          │ composer                  │
/// │          ├───────────────────────────┤
/// │          │ feed                      │
/// └──────────┴───────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub sidebar: Rect,
    pub title: Rect,
    pub composer: Rect,
    pub feed: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, composer_height: u16) -> Self {
        use Constraint::{Length, Min};
        let [sidebar, main] = Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(area);
        let [title, composer, feed] =
            Layout::vertical([Length(1), Length(composer_height), Min(0)]).areas(main);
        Self {
            sidebar,
            title,
            composer,
            feed,
        }
    }

    /// Layout for the current state of `app` and `tui` in `area`.
    pub fn compute(area: Rect, app: &App, tui: &TuiState) -> Self {
        let main_width = area.width.saturating_sub(SIDEBAR_WIDTH);
        let text_height = tui.composer_input.calculate_height(main_width);
        let composer_height = ComposerLayout::height(text_height, app.composer.image_form_open);
        Self::new(area, composer_height)
    }

    pub fn composer_layout(&self, app: &App, tui: &TuiState) -> ComposerLayout {
        let text_height = tui.composer_input.calculate_height(self.composer.width);
        ComposerLayout::new(self.composer, text_height, app.composer.image_form_open)
    }
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Sidebar(usize),
    Composer(ComposerHit),
    /// A tweet row, or empty feed space.
    Feed(Option<usize>),
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let layout = ScreenLayout::compute(frame.area(), app, tui);

    let rows = app.sidebar_rows();
    Sidebar {
        rows: &rows,
        selected: tui.sidebar_selected,
        focused: tui.focus == Focus::Sidebar,
        user: app.session.current().map(|s| s.display_name()),
        auth_pending: app.auth_pending,
    }
    .render(frame, layout.sidebar);

    TitleBar::new(app.notices.current(), spinner_frame).render(frame, layout.title);

    ComposerPanel {
        text_input: &mut tui.composer_input,
        image_input: &mut tui.image_input,
        composer: &app.composer,
        can_submit: app.can_submit(),
    }
    .render(frame, layout.composer);

    FeedList {
        state: &mut tui.feed_list,
        tweets: app.feed.tweets(),
        generation: app.feed.committed_generation(),
        is_refreshing: app.feed.is_refreshing(),
        focused: tui.focus == Focus::Feed,
        now: Utc::now(),
    }
    .render(frame, layout.feed);
}

/// Map a click at (`column`, `row`) to the element under it.
pub fn hit_test(frame_area: Rect, app: &App, tui: &TuiState, column: u16, row: u16) -> Option<Hit> {
    let layout = ScreenLayout::compute(frame_area, app, tui);
    let point = Position::new(column, row);

    if layout.sidebar.contains(point) {
        return Sidebar::hit_test(layout.sidebar, app.sidebar_rows().len(), column, row)
            .map(Hit::Sidebar);
    }
    if layout.composer.contains(point) {
        return layout
            .composer_layout(app, tui)
            .hit(column, row)
            .map(Hit::Composer);
    }
    if layout.feed.contains(point) {
        let content_y = (row - layout.feed.y) + tui.feed_list.scroll_state.offset().y;
        return Some(Hit::Feed(tui.feed_list.row_at(content_y)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{signed_in_app, test_app, tweet};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_app(texts: &[&str]) -> App {
        let mut app = signed_in_app("ada");
        let generation = app.feed.begin_refresh();
        let tweets = texts
            .iter()
            .enumerate()
            .map(|(i, text)| tweet(&i.to_string(), text))
            .collect();
        update(&mut app, Action::FeedLoaded { generation, result: Ok(tweets) });
        app
    }

    #[test]
    fn test_draw_ui_anonymous() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.sync(&app);
        let text = render(&app, &mut tui, 100, 30);
        assert!(text.contains("chirp"));
        assert!(text.contains("Sign In to Tweet!"));
        assert!(text.contains("Sign In"));
        assert!(text.contains("No tweets yet"));
    }

    #[test]
    fn test_draw_ui_with_feed() {
        let app = loaded_app(&["first tweet", "second tweet"]);
        let mut tui = TuiState::new();
        tui.sync(&app);
        let text = render(&app, &mut tui, 100, 30);
        assert!(text.contains("What's Happening?"));
        assert!(text.contains("Sign Out"));
        assert!(text.contains("first tweet"));
        assert!(text.contains("second tweet"));
    }

    #[test]
    fn test_screen_layout_regions() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 100, 30), 4);
        assert_eq!(layout.sidebar, Rect::new(0, 0, SIDEBAR_WIDTH, 30));
        assert_eq!(layout.title, Rect::new(SIDEBAR_WIDTH, 0, 100 - SIDEBAR_WIDTH, 1));
        assert_eq!(layout.composer.y, 1);
        assert_eq!(layout.composer.height, 4);
        assert_eq!(layout.feed.y, 5);
        assert_eq!(layout.feed.height, 25);
    }

    #[test]
    fn test_hit_test_regions() {
        let app = loaded_app(&["first tweet", "second tweet"]);
        let mut tui = TuiState::new();
        tui.sync(&app);
        let area = Rect::new(0, 0, 100, 30);
        // Lays out the feed cache
        render(&app, &mut tui, 100, 30);

        assert_eq!(hit_test(area, &app, &tui, 3, 1), Some(Hit::Sidebar(0)));
        assert_eq!(hit_test(area, &app, &tui, 3, 7), Some(Hit::Sidebar(6)));
        assert_eq!(
            hit_test(area, &app, &tui, SIDEBAR_WIDTH + 5, 2),
            Some(Hit::Composer(ComposerHit::Text))
        );
        // Composer text box is 3 rows (1..4), toolbar on row 4
        assert_eq!(
            hit_test(area, &app, &tui, 99, 4),
            Some(Hit::Composer(ComposerHit::TweetButton))
        );
        // Feed starts at row 5; rows are 3 tall
        assert_eq!(hit_test(area, &app, &tui, 40, 5), Some(Hit::Feed(Some(0))));
        assert_eq!(hit_test(area, &app, &tui, 40, 8), Some(Hit::Feed(Some(1))));
        assert_eq!(hit_test(area, &app, &tui, 40, 20), Some(Hit::Feed(None)));
    }
}
