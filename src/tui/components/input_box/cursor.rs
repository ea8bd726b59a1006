//! Cursor position tracking and navigation for the InputBox.
//!
//! `CursorState` owns the cursor byte offset and the internal scroll of the
//! box. The text itself stays in `InputBox` and is passed in explicitly.

use super::text_wrap::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, floor_char_boundary, inner_width, next_word_boundary,
    prev_word_boundary, wrap_line_count, wrap_options,
};
use ratatui::layout::Rect;

pub(super) struct CursorState {
    /// Byte offset in the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line (0 when content fits)
    pub scroll_offset: u16,
    /// Width from the last render, used for vertical movement between frames
    pub last_content_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 60;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_content_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Put the cursor at the end of `buffer` (after the text is replaced from outside).
    pub fn move_to_end(&mut self, buffer: &str) {
        self.pos = buffer.len();
        self.scroll_offset = 0;
    }

    pub fn word_left(&mut self, buffer: &str) -> bool {
        let target = prev_word_boundary(buffer, self.pos);
        let moved = target != self.pos;
        self.pos = target;
        moved
    }

    pub fn word_right(&mut self, buffer: &str) -> bool {
        let target = next_word_boundary(buffer, self.pos);
        let moved = target != self.pos;
        self.pos = target;
        moved
    }

    /// Move one wrapped line up (`direction < 0`) or down, keeping the column
    /// where possible. Returns `false` at the first/last line.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16, content_width: u16) -> bool {
        let width = inner_width(content_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let lines = textwrap::wrap(buffer, wrap_options(width));
        if lines.is_empty() {
            return false;
        }

        // Bytes a wrapped line spans in the buffer, counting its hard newline
        let span = |line: &str, offset: usize| -> usize {
            let end = offset + line.len();
            line.len() + usize::from(end < buffer.len() && buffer.as_bytes()[end] == b'\n')
        };

        // Column is kept in chars so it means the same thing on every line
        let mut offset = 0;
        let mut line_idx = 0;
        let mut column = 0;
        for (idx, line) in lines.iter().enumerate() {
            if offset + line.len() >= self.pos {
                line_idx = idx;
                let byte_col = floor_char_boundary(line, self.pos.saturating_sub(offset));
                column = line[..byte_col].chars().count();
                break;
            }
            offset += span(line, offset);
        }

        let target_idx = if direction < 0 {
            match line_idx.checked_sub(1) {
                Some(idx) => idx,
                None => return false,
            }
        } else if line_idx + 1 < lines.len() {
            line_idx + 1
        } else {
            return false;
        };

        let mut target_start = 0;
        for line in lines.iter().take(target_idx) {
            target_start += span(line, target_start);
        }
        let target = &lines[target_idx];
        let byte_in_line = target
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(target.len());
        // Trimmed wrap spaces can skew the offset; never leave pos inside a char
        self.pos = floor_char_boundary(buffer, target_start + byte_in_line);
        true
    }

    /// Wrapped line (0-based) the cursor is on.
    pub fn calculate_line(&self, buffer: &str, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }

        let lines = textwrap::wrap(&buffer[..self.pos], wrap_options(width));
        let mut line = lines.len().saturating_sub(1) as u16;
        // A newline right before the cursor starts a line textwrap did not emit
        if self.pos > 0
            && buffer.as_bytes()[self.pos - 1] == b'\n'
            && !lines.last().is_some_and(|l| l.is_empty())
        {
            line += 1;
        }
        line
    }

    /// Keep the cursor line inside a window of `max_lines` lines.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16, max_lines: u16) {
        let total = wrap_line_count(buffer, inner_width(content_width));
        if total <= max_lines {
            self.scroll_offset = 0;
            return;
        }

        let line = self.calculate_line(buffer, content_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + max_lines {
            self.scroll_offset = line + 1 - max_lines;
        }
    }

    /// Screen (column, row) of the cursor inside the bordered `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        let origin = (area.x + CONTENT_OFFSET_X, area.y + CONTENT_OFFSET_Y);
        if width == 0 {
            return origin;
        }

        let before = &buffer[..self.pos];
        let options = wrap_options(width);
        let line = self.calculate_line(buffer, area.width);

        // Count chars from the last hard newline; textwrap trims trailing spaces
        // so wrapped segment lengths can't be used directly.
        let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let segments = textwrap::wrap(logical, options);
        let column = match segments.split_last() {
            Some((_, earlier)) => {
                let consumed: usize = earlier.iter().map(|s| s.chars().count()).sum();
                logical.chars().count().saturating_sub(consumed) as u16
            }
            None => 0,
        };

        let visible_line = line.saturating_sub(self.scroll_offset);
        (origin.0 + column, origin.1 + visible_line)
    }
}
