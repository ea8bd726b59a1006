use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::api::Tweet;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single tweet: bordered block titled with author and age, the text,
/// and the attached image URL when there is one.
///
/// Created fresh each frame by `FeedList`. `calculate_height` predicts the
/// rendered height with `textwrap` so the list can lay out its scroll canvas
/// without rendering every row.
#[derive(Clone, Copy)]
pub struct TweetRow<'a> {
    pub tweet: &'a Tweet,
    pub now: DateTime<Utc>,
    pub is_selected: bool,
}

impl<'a> TweetRow<'a> {
    pub fn new(tweet: &'a Tweet, now: DateTime<Utc>, is_selected: bool) -> Self {
        Self {
            tweet,
            now,
            is_selected,
        }
    }

    pub fn calculate_height(tweet: &Tweet, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let text = tweet.text.trim();
        let text_lines = if text.is_empty() {
            1
        } else {
            (textwrap::wrap(text, wrap_options(content_width)).len() as u16).max(1)
        };
        let image_lines = u16::from(tweet.image.is_some());

        text_lines + image_lines + VERTICAL_OVERHEAD
    }

    fn title(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                format!(" {} ", self.tweet.username),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "@{} · {} ",
                    handle(&self.tweet.username),
                    relative_time(self.tweet.created_at, self.now)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Display handle for an author name: lowercase, spaces removed.
pub fn handle(username: &str) -> String {
    username
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compact age of a tweet: `now`, `42s`, `5m`, `3h`, `2d`, then a date.
pub fn relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds();
    match secs {
        s if s < 5 => "now".to_string(),
        s if s < 60 => format!("{s}s"),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s if s < 7 * 86_400 => format!("{}d", s / 86_400),
        _ => created.format("%b %-d, %Y").to_string(),
    }
}

impl<'a> Widget for TweetRow<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = textwrap::wrap(self.tweet.text.trim(), wrap_options(inner.width))
            .into_iter()
            .map(|l| Line::raw(l.into_owned()))
            .collect();
        if let Some(image) = &self.tweet.image {
            lines.push(Line::from(vec![
                Span::styled("▣ ", Style::default().fg(Color::Magenta)),
                Span::styled(
                    image.as_str(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

impl<'a> Component for TweetRow<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
