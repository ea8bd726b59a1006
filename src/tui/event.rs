use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Global commands
    Quit,            // Ctrl+C / Ctrl+Q
    Refresh,         // Ctrl+R
    ToggleImageForm, // Ctrl+P
    FocusNext,       // Tab
    FocusPrev,       // Shift+Tab
    Escape,
    Submit,

    // Text editing (routed to the focused input)
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    WordLeft,
    WordRight,
    CursorHome,
    CursorEnd,
    CursorUp,
    CursorDown,

    // Feed scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,

    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Keyboard enhancement reports releases too; act on presses only
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c' | 'q')) => Some(TuiEvent::Quit),
                (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(TuiEvent::Refresh),
                (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(TuiEvent::ToggleImageForm),
                // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
                (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
                (KeyModifiers::CONTROL, KeyCode::Left) => Some(TuiEvent::WordLeft),
                (KeyModifiers::CONTROL, KeyCode::Right) => Some(TuiEvent::WordRight),
                (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                    Some(TuiEvent::InputChar(c))
                }
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Tab) => Some(TuiEvent::FocusNext),
                (_, KeyCode::BackTab) => Some(TuiEvent::FocusPrev),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
                (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};

    fn key(modifiers: KeyModifiers, code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(TuiEvent::Quit)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('r'))),
            Some(TuiEvent::Refresh)
        );
        assert_eq!(
            translate(key(KeyModifiers::CONTROL, KeyCode::Char('p'))),
            Some(TuiEvent::ToggleImageForm)
        );
        // Unmapped control chords are not typed into the input
        assert_eq!(translate(key(KeyModifiers::CONTROL, KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_shifted_chars_are_input() {
        assert_eq!(
            translate(key(KeyModifiers::SHIFT, KeyCode::Char('A'))),
            Some(TuiEvent::InputChar('A'))
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(event), None);
    }

    #[test]
    fn test_left_click() {
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(event), Some(TuiEvent::MouseClick(4, 7)));
    }
}
