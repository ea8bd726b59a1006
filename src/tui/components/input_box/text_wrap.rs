//! Wrapping and boundary helpers shared by the input box and its cursor.
//!
//! Everything here is a pure function of the text and a width.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from area edge to content (border + left padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;
/// Offset from area edge to content (top border)
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// Options matching how the box lays text out: hard breaks for long words,
/// spaces as the only separators.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner text width of a box `content_width` columns wide, 0 when too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Number of display lines `text` occupies at `width`. Never less than 1,
/// and a trailing newline counts as an (empty) line of its own.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    // The cursor sits on the line after a trailing newline, but textwrap
    // only emits that line sometimes
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

/// Largest char boundary in `text` at or before `pos` (clamped to the end).
pub(super) fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Byte offset of the char that ends right before `pos`, or 0 at the start.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset just past the char starting at `pos`, or `text.len()` at the end.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Letters, digits and `_` form words; everything else separates them.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, skipping any separators first
/// (readline `backward-word`).
///
/// Punctuation counts as a separator, so in a URL each path segment is its
/// own word.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[..pos].char_indices().rev().peekable();

    // Walk back over separators directly left of the cursor
    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }

    // Then over the word itself; hitting the start of text leaves 0
    let mut boundary = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !is_word_char(c) {
            boundary = i + c.len_utf8();
            break;
        }
        boundary = i;
        chars.next();
    }
    boundary
}

/// End of the word after `pos`, skipping any separators first
/// (readline `forward-word`).
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();

    // Separators first, then the word they lead into
    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    while chars.peek().is_some_and(|&(_, c)| is_word_char(c)) {
        chars.next();
    }

    // Indices are relative to the slice; shift back into `text`
    match chars.peek() {
        Some(&(i, _)) => pos + i,
        None => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_never_below_one() {
        assert_eq!(wrap_line_count("", 40), 1);
        assert_eq!(wrap_line_count("anything", 0), 1);
    }

    #[test]
    fn line_count_wraps_and_counts_newlines() {
        assert_eq!(wrap_line_count("What's Happening?", 40), 1);
        assert_eq!(wrap_line_count("abcdefghij", 5), 2);
        assert_eq!(wrap_line_count("one\ntwo\nthree", 40), 3);
        assert_eq!(wrap_line_count("draft\n", 40), 2);
    }

    #[test]
    fn inner_width_saturates() {
        assert_eq!(inner_width(30), 26);
        assert_eq!(inner_width(3), 0);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        // "hé🐦" = h(1) é(2) 🐦(4)
        let s = "hé🐦";
        assert_eq!(next_char_boundary(s, 0), 1);
        assert_eq!(next_char_boundary(s, 1), 3);
        assert_eq!(next_char_boundary(s, 3), 7);
        assert_eq!(prev_char_boundary(s, 7), 3);
        assert_eq!(prev_char_boundary(s, 3), 1);
        assert_eq!(prev_char_boundary(s, 1), 0);
    }

    #[test]
    fn floor_boundary_backs_out_of_multibyte() {
        let s = "aé";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
        assert_eq!(floor_char_boundary(s, 99), 3);
    }

    #[test]
    fn word_motion_skips_separators() {
        let s = "just setting up my   chirp";
        assert_eq!(prev_word_boundary(s, s.len()), 21);
        assert_eq!(prev_word_boundary(s, 21), 16);
        assert_eq!(prev_word_boundary(s, 0), 0);
        assert_eq!(next_word_boundary(s, 0), 4);
        assert_eq!(next_word_boundary(s, 18), s.len());
    }

    #[test]
    fn word_motion_treats_url_punctuation_as_separator() {
        let s = "https://example.com/cat.png";
        assert_eq!(prev_word_boundary(s, s.len()), 24);
        assert_eq!(next_word_boundary(s, 0), 5);
    }
}
