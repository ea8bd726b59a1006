//! # Composer Panel
//!
//! The "new tweet" box at the top of the feed:
//!
//! ```text
//! ╭ What's happening? ─────────────────────────╮
//! │ just setting up my chirp                   │
//! ╰────────────────────────────────────────────╯
//! ╭ Image URL ─────────────────────────────────╮   (only while the form is open)
//! │ https://example.com/cat.png                │
//! ╰────────────────────────────────────────────╯
//!  [▣ Image] ▣ https://example.com/cat.png           Tweet
//! ```
//!
//! The panel lays out and draws two `InputBox`es plus a toolbar. Text and
//! form state come from core's `Composer`; the boxes only mirror it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::composer::Composer;
use crate::tui::component::Component;
use crate::tui::components::input_box::InputBox;

/// Height of the image URL form (single line + borders).
const IMAGE_FORM_HEIGHT: u16 = 3;
const TOOLBAR_HEIGHT: u16 = 1;
const IMAGE_TOGGLE_LABEL: &str = " [▣ Image] ";
const TWEET_BUTTON_LABEL: &str = " Tweet ";

/// Screen regions of the composer, shared by rendering and mouse hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerLayout {
    pub text: Rect,
    pub image_form: Option<Rect>,
    pub toolbar: Rect,
    pub image_toggle: Rect,
    pub tweet_button: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerHit {
    Text,
    ImageForm,
    ImageToggle,
    TweetButton,
}

impl ComposerLayout {
    pub fn new(area: Rect, text_height: u16, image_form_open: bool) -> Self {
        let form_height = if image_form_open { IMAGE_FORM_HEIGHT } else { 0 };
        let [text, image_form, toolbar] = Layout::vertical([
            Constraint::Length(text_height),
            Constraint::Length(form_height),
            Constraint::Length(TOOLBAR_HEIGHT),
        ])
        .areas(area);

        let toggle_width = (IMAGE_TOGGLE_LABEL.chars().count() as u16).min(toolbar.width);
        let button_width = (TWEET_BUTTON_LABEL.len() as u16).min(toolbar.width);
        let line_height = toolbar.height.min(TOOLBAR_HEIGHT);
        Self {
            text,
            image_form: image_form_open.then_some(image_form),
            toolbar,
            image_toggle: Rect::new(toolbar.x, toolbar.y, toggle_width, line_height),
            tweet_button: Rect::new(
                toolbar.x + toolbar.width - button_width,
                toolbar.y,
                button_width,
                line_height,
            ),
        }
    }

    /// Total height the composer needs.
    pub fn height(text_height: u16, image_form_open: bool) -> u16 {
        let form_height = if image_form_open { IMAGE_FORM_HEIGHT } else { 0 };
        text_height + form_height + TOOLBAR_HEIGHT
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<ComposerHit> {
        let p = ratatui::layout::Position::new(column, row);
        if self.tweet_button.contains(p) {
            Some(ComposerHit::TweetButton)
        } else if self.image_toggle.contains(p) {
            Some(ComposerHit::ImageToggle)
        } else if self.image_form.is_some_and(|r| r.contains(p)) {
            Some(ComposerHit::ImageForm)
        } else if self.text.contains(p) {
            Some(ComposerHit::Text)
        } else {
            None
        }
    }
}

pub struct ComposerPanel<'a> {
    pub text_input: &'a mut InputBox,
    pub image_input: &'a mut InputBox,
    pub composer: &'a Composer,
    pub can_submit: bool,
}

impl<'a> ComposerPanel<'a> {
    fn toolbar(&self, width: u16) -> Line<'a> {
        let toggle_style = if self.composer.image_form_open {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        let button_style = if self.composer.posting {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::DIM)
        } else if self.can_submit {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };

        let toggle_width = IMAGE_TOGGLE_LABEL.chars().count();
        let button_width = TWEET_BUTTON_LABEL.len();
        let middle_width = (width as usize).saturating_sub(toggle_width + button_width);

        let attached = match &self.composer.image {
            Some(url) => truncate(&format!("▣ {url}"), middle_width),
            None => String::new(),
        };
        let padding = middle_width.saturating_sub(attached.width());

        Line::from(vec![
            Span::styled(IMAGE_TOGGLE_LABEL, toggle_style),
            Span::styled(attached, Style::default().fg(Color::DarkGray)),
            Span::raw(" ".repeat(padding)),
            Span::styled(TWEET_BUTTON_LABEL, button_style),
        ])
    }
}

/// Cut `text` to `max` display columns, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl<'a> Component for ComposerPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text_height = self.text_input.calculate_height(area.width);
        let layout = ComposerLayout::new(area, text_height, self.composer.image_form_open);

        self.text_input.render(frame, layout.text);
        if let Some(form_area) = layout.image_form {
            self.image_input.render(frame, form_area);
        }
        frame.render_widget(Paragraph::new(self.toolbar(layout.toolbar.width)), layout.toolbar);
    }
}
