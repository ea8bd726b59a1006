//! # FeedList Component
//!
//! Scrollable view of the feed, in the order the remote returned it.
//!
//! ## Responsibilities
//!
//! - Display the committed tweets as `TweetRow`s
//! - Scrolling, keyboard selection and mouse hit testing
//! - Cache row heights per (feed generation, width)
//! - Show an empty state while there is nothing to list
//!
//! ## Architecture
//!
//! `FeedList` is a transient component created each frame around
//! `&'a mut FeedListState` (persistent) and the tweets (props). A new feed
//! generation replaces the list wholesale, so the cache is rebuilt and the
//! view jumps back to the newest tweet.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::Tweet;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::tweet_row::TweetRow;
use crate::tui::event::TuiEvent;

pub const EMPTY_TEXT: &str = "No tweets yet. Press Ctrl+R to refresh.";
pub const LOADING_TEXT: &str = "Loading tweets...";

#[derive(Default)]
pub struct FeedListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl FeedListState {
    pub fn new() -> Self {
        Self::default()
    }

    fn total_height(&self) -> u16 {
        self.layout.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        });
        self.scroll_to_selected();
    }

    pub fn select_prev(&mut self, count: usize) {
        if count == 0 {
            self.selected_index = None;
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
        self.scroll_to_selected();
    }

    /// Scroll so the selected row is fully visible, aligning its top edge
    /// when it is taller than the viewport.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        let Some(&bottom) = self.layout.prefix_heights.get(idx) else {
            return;
        };
        let top = bottom - self.layout.heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y + self.viewport_height {
            let y = bottom.saturating_sub(self.viewport_height).min(top);
            self.scroll_state.set_offset(Position { x: 0, y });
        }
    }

    /// Row index under a content-relative y coordinate.
    pub fn row_at(&self, content_y: u16) -> Option<usize> {
        let idx = self.layout.prefix_heights.partition_point(|&end| end <= content_y);
        (idx < self.layout.prefix_heights.len()).then_some(idx)
    }
}

/// Scrolling only; selection is driven by the parent because it needs the tweet count.
impl EventHandler for FeedListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

/// Row heights for one feed generation at one width.
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    generation: u64,
    content_width: u16,
}

impl LayoutCache {
    /// Whether the cached heights still describe `tweets` at `content_width`.
    pub fn is_valid(&self, generation: u64, content_width: u16, tweet_count: usize) -> bool {
        self.generation == generation
            && self.content_width == content_width
            && self.heights.len() == tweet_count
    }

    pub fn rebuild(&mut self, tweets: &[Tweet], generation: u64, content_width: u16) {
        self.heights = tweets
            .iter()
            .map(|t| TweetRow::calculate_height(t, content_width))
            .collect();
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
        self.generation = generation;
        self.content_width = content_width;
    }

    /// Rows intersecting the viewport plus half a viewport of slack either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let slack = viewport_height / 2;
        let from = scroll_offset.saturating_sub(slack);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(slack);

        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}

pub struct FeedList<'a> {
    pub state: &'a mut FeedListState,
    pub tweets: &'a [Tweet],
    pub generation: u64,
    pub is_refreshing: bool,
    pub focused: bool,
    pub now: DateTime<Utc>,
}

impl<'a> Component for FeedList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state.viewport_height = area.height;

        if self.tweets.is_empty() {
            self.state.layout.rebuild(self.tweets, self.generation, content_width);
            self.state.selected_index = None;
            let text = if self.is_refreshing {
                LOADING_TEXT
            } else {
                EMPTY_TEXT
            };
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                );
            let y = area.y + area.height / 3;
            frame.render_widget(empty, Rect::new(area.x, y, area.width, area.height.min(1)));
            return;
        }

        // 1. Refresh the layout cache
        let layout = &mut self.state.layout;
        if !layout.is_valid(self.generation, content_width, self.tweets.len()) {
            let new_generation = layout.generation != self.generation;
            layout.rebuild(self.tweets, self.generation, content_width);
            if new_generation {
                self.state.scroll_state.scroll_to_top();
                self.state.selected_index = None;
            }
        }
        if let Some(idx) = self.state.selected_index
            && idx >= self.tweets.len()
        {
            self.state.selected_index = Some(self.tweets.len() - 1);
        }
        self.state.clamp_scroll();

        // 2. Render visible rows into a ScrollView
        let total_height = self.state.total_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);
        for i in visible {
            let height = self.state.layout.heights[i];
            let top = self.state.layout.prefix_heights[i] - height;
            let is_selected = self.focused && self.state.selected_index == Some(i);
            let row = TweetRow::new(&self.tweets[i], self.now, is_selected);
            scroll_view.render_widget(row, Rect::new(0, top, content_width, height));
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tweet;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn tweets(n: usize) -> Vec<Tweet> {
        (0..n)
            .map(|i| tweet(&i.to_string(), &format!("tweet number {i}")))
            .collect()
    }

    fn draw(state: &mut FeedListState, tweets: &[Tweet], generation: u64, size: (u16, u16)) -> String {
        let now = tweet("x", "").created_at;
        let mut terminal = Terminal::new(TestBackend::new(size.0, size.1)).unwrap();
        terminal
            .draw(|f| {
                FeedList {
                    state: &mut *state,
                    tweets,
                    generation,
                    is_refreshing: false,
                    focused: true,
                    now,
                }
                .render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_state() {
        let mut state = FeedListState::new();
        let text = draw(&mut state, &[], 0, (60, 10));
        assert!(text.contains("No tweets yet"));
    }

    #[test]
    fn test_renders_rows_in_order() {
        let mut state = FeedListState::new();
        let list = tweets(2);
        let text = draw(&mut state, &list, 1, (60, 10));
        let first = text.find("tweet number 0").unwrap();
        let second = text.find("tweet number 1").unwrap();
        assert!(first < second);
        assert_eq!(state.layout.heights, vec![3, 3]);
        assert_eq!(state.layout.prefix_heights, vec![3, 6]);
    }

    #[test]
    fn test_keeps_remote_order_regardless_of_age() {
        let mut state = FeedListState::new();
        let mut older = tweet("old", "older tweet listed first");
        older.created_at = older.created_at - chrono::Duration::days(3);
        let list = vec![older, tweet("new", "newer tweet listed second")];

        let text = draw(&mut state, &list, 1, (60, 10));
        let older_at = text.find("older tweet listed first").unwrap();
        let newer_at = text.find("newer tweet listed second").unwrap();
        assert!(older_at < newer_at);
    }

    #[test]
    fn test_new_generation_scrolls_to_top() {
        let mut state = FeedListState::new();
        let list = tweets(10);
        draw(&mut state, &list, 1, (60, 6));

        state.handle_event(&TuiEvent::ScrollPageDown);
        assert!(state.scroll_state.offset().y > 0);

        // Same generation keeps the position
        draw(&mut state, &list, 1, (60, 6));
        assert!(state.scroll_state.offset().y > 0);

        draw(&mut state, &list, 2, (60, 6));
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_selection_scrolls_into_view() {
        let mut state = FeedListState::new();
        let list = tweets(10);
        draw(&mut state, &list, 1, (60, 6));

        for _ in 0..4 {
            state.select_next(list.len());
        }
        assert_eq!(state.selected_index, Some(3));
        // Row 3 spans 9..12; a 6-row viewport must start at 6
        assert_eq!(state.scroll_state.offset().y, 6);

        state.select_prev(list.len());
        state.select_prev(list.len());
        state.select_prev(list.len());
        assert_eq!(state.selected_index, Some(0));
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_row_at() {
        let mut state = FeedListState::new();
        state.layout.rebuild(&tweets(3), 1, 59);
        assert_eq!(state.row_at(0), Some(0));
        assert_eq!(state.row_at(3), Some(1));
        assert_eq!(state.row_at(8), Some(2));
        assert_eq!(state.row_at(9), None);
    }

    #[test]
    fn test_visible_range_with_slack() {
        let mut cache = LayoutCache::default();
        cache.heights = vec![3; 20];
        cache.prefix_heights = (1..=20).map(|i| i * 3).collect();
        // Viewport rows 30..36, slack 3 → rows 27..39 → items 9..=12
        assert_eq!(cache.visible_range(30, 6), 9..13);
    }
}
