//! # InputBox Component
//!
//! A bordered, wrapping text field. The composer uses one for the tweet text
//! and a single-line one for the image URL form.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor and word movement, paste)
//! - Emit `Changed` on every edit and `Submit` on Enter
//! - Show a placeholder when empty
//!
//! ## State Management
//!
//! The buffer is a local copy. Core owns the authoritative text: the parent
//! forwards `Changed` to core and calls [`InputBox::sync`] each frame so a
//! reset in core (after a successful post) clears the box.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary, wrap_line_count,
    wrap_options,
};

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. The buffer is left as is; the parent decides what happens.
    Submit,
    /// Buffer contents changed.
    Changed(String),
}

pub struct InputBox {
    pub buffer: String,
    pub title: String,
    pub placeholder: String,
    /// Draws the cursor and a highlighted border.
    pub focused: bool,
    /// Visible lines before the box scrolls internally.
    pub max_lines: u16,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>, max_lines: u16) -> Self {
        Self {
            buffer: String::new(),
            title: title.into(),
            placeholder: placeholder.into(),
            focused: false,
            max_lines: max_lines.max(1),
            cursor: CursorState::new(),
        }
    }

    /// Replace the buffer with `text` if it differs, moving the cursor to the end.
    /// Returns `true` when the buffer changed.
    pub fn sync(&mut self, text: &str) -> bool {
        if self.buffer == text {
            return false;
        }
        self.buffer = text.to_string();
        self.cursor.move_to_end(&self.buffer);
        true
    }

    /// Height needed for the current buffer, clamped to `max_lines` of content.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let lines = wrap_line_count(&self.buffer, inner_width(content_width));
        lines.min(self.max_lines) + VERTICAL_OVERHEAD
    }

    fn visible_text(&self, content_width: u16) -> String {
        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        // Pre-wrapped with the same options the cursor math uses
        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + self.max_lines as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn changed(&self) -> Option<InputEvent> {
        Some(InputEvent::Changed(self.buffer.clone()))
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, self.max_lines);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str())
            .title_style(border_style)
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.visible_text(area.width))
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                // Single-line boxes have no use for newlines
                if *c == '\n' && self.max_lines == 1 {
                    return None;
                }
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                let text = if self.max_lines == 1 {
                    text.replace(['\r', '\n'], "")
                } else {
                    text.replace("\r\n", "\n")
                };
                if text.is_empty() {
                    return None;
                }
                self.buffer.insert_str(self.cursor.pos, &text);
                self.cursor.pos += text.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::WordLeft => {
                self.cursor.word_left(&self.buffer);
                None
            }
            TuiEvent::WordRight => {
                self.cursor.word_right(&self.buffer);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor.pos = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor.pos = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                None
            }
            TuiEvent::CursorUp => {
                let width = self.cursor.last_content_width;
                self.cursor.move_vertically(&self.buffer, -1, width);
                None
            }
            TuiEvent::CursorDown => {
                let width = self.cursor.last_content_width;
                self.cursor.move_vertically(&self.buffer, 1, width);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(input: &mut InputBox, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_emits_changed() {
        let mut input = InputBox::new("Tweet", "What's Happening?", 4);
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('h')),
            Some(InputEvent::Changed("h".to_string()))
        );
        input.handle_event(&TuiEvent::InputChar('i'));
        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::Changed("h".to_string()))
        );
        assert_eq!(input.buffer, "h");
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut input = InputBox::new("Tweet", "", 4);
        input.sync("hello");
        assert_eq!(input.handle_event(&TuiEvent::Submit), Some(InputEvent::Submit));
        assert_eq!(input.buffer, "hello");
    }

    #[test]
    fn test_sync_moves_cursor_to_end() {
        let mut input = InputBox::new("Tweet", "", 4);
        assert!(input.sync("abc"));
        assert!(!input.sync("abc"));
        input.handle_event(&TuiEvent::InputChar('d'));
        assert_eq!(input.buffer, "abcd");

        assert!(input.sync(""));
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_single_line_drops_newlines() {
        let mut input = InputBox::new("Image", "Enter image Url...", 1);
        assert_eq!(input.handle_event(&TuiEvent::InputChar('\n')), None);
        input.handle_event(&TuiEvent::Paste("https://x.io/\na.png\r\n".to_string()));
        assert_eq!(input.buffer, "https://x.io/a.png");
    }

    #[test]
    fn test_cursor_moves_do_not_emit() {
        let mut input = InputBox::new("Tweet", "", 4);
        input.sync("hello");
        assert_eq!(input.handle_event(&TuiEvent::CursorLeft), None);
        assert_eq!(input.handle_event(&TuiEvent::CursorHome), None);
        input.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(input.buffer, ">hello");
    }

    #[test]
    fn test_vertical_moves_over_accented_text_then_type() {
        let mut input = InputBox::new("Tweet", "", 4);
        input.sync("a\néx");
        input.handle_event(&TuiEvent::CursorUp);
        input.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('z')),
            Some(InputEvent::Changed("a\nézx".to_string()))
        );
    }

    #[test]
    fn test_height_clamps_to_max_lines() {
        let mut input = InputBox::new("Tweet", "", 3);
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        input.sync("a\nb\nc\nd\ne");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let mut input = InputBox::new("Tweet", "Sign In to Tweet!", 4);
        let text = rendered_text(&mut input, 40, 3);
        assert!(text.contains("Tweet"));
        assert!(text.contains("Sign In to Tweet!"));

        input.sync("typed");
        let text = rendered_text(&mut input, 40, 3);
        assert!(text.contains("typed"));
        assert!(!text.contains("Sign In"));
    }
}
