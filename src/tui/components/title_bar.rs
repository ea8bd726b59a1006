//! # TitleBar Component
//!
//! One-line header above the composer: the page name on the left and the
//! current notice ("toast") on the right.
//!
//! Purely presentational. All data arrives as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.notices.current(), spinner_frame);
//! title_bar.render(frame, title_area);
//! ```
//!
//! Notice styling follows its kind:
//!
//! 1. **Loading**: `⠋ Refreshing...` with an animated braille spinner
//! 2. **Success**: `✔ Feed Updated!` in green
//! 3. **Error**: `✖ Refresh failed: ...` in red

use crate::core::notice::{Notice, NoticeKind};
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub const PAGE_TITLE: &str = "Home";
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub notice: Option<&'a Notice>,
    pub spinner_frame: usize,
}

impl<'a> TitleBar<'a> {
    pub fn new(notice: Option<&'a Notice>, spinner_frame: usize) -> Self {
        Self {
            notice,
            spinner_frame,
        }
    }

    fn notice_line(&self) -> Option<Line<'a>> {
        let notice = self.notice?;
        let (icon, style) = match notice.kind {
            NoticeKind::Loading => (
                SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()],
                Style::default().fg(Color::Cyan),
            ),
            NoticeKind::Success => ("✔", Style::default().fg(Color::Green)),
            NoticeKind::Error => ("✖", Style::default().fg(Color::Red)),
        };
        Some(Line::from(vec![
            Span::styled(format!("{icon} "), style),
            Span::styled(notice.message.as_str(), style),
            Span::raw(" "),
        ]))
    }
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            format!(" {PAGE_TITLE}"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, area);

        if let Some(line) = self.notice_line() {
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notice::Notices;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_without_notice() {
        let text = rendered(&mut TitleBar::new(None, 0));
        assert!(text.contains("Home"));
        assert!(!text.contains('✔'));
    }

    #[test]
    fn test_loading_notice_spins() {
        let mut notices = Notices::default();
        notices.loading("Refreshing...");

        let first = rendered(&mut TitleBar::new(notices.current(), 0));
        let second = rendered(&mut TitleBar::new(notices.current(), 1));
        assert!(first.contains("⠋ Refreshing..."));
        assert!(second.contains("⠙ Refreshing..."));
    }

    #[test]
    fn test_success_and_error_icons() {
        let mut notices = Notices::default();
        let id = notices.loading("Refreshing...");
        notices.replace(id, NoticeKind::Success, "Feed Updated!");
        assert!(rendered(&mut TitleBar::new(notices.current(), 0)).contains("✔ Feed Updated!"));

        notices.error("Tweet failed");
        assert!(rendered(&mut TitleBar::new(notices.current(), 0)).contains("✖ Tweet failed"));
    }
}
