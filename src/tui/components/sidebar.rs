//! Navigation rail on the left: one line per sidebar row, the signed-in
//! user's name pinned to the bottom.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::core::sidebar::{SidebarIcon, SidebarRow};
use crate::tui::component::Component;

pub const SIDEBAR_WIDTH: u16 = 22;
const BRAND: &str = " chirp ";

fn glyph(icon: SidebarIcon) -> &'static str {
    match icon {
        SidebarIcon::Home => "⌂",
        SidebarIcon::Hashtag => "#",
        SidebarIcon::Bell => "♪",
        SidebarIcon::Mail => "✉",
        SidebarIcon::Bookmark => "★",
        SidebarIcon::Collection => "≡",
        SidebarIcon::User => "☺",
    }
}

pub struct Sidebar<'a> {
    pub rows: &'a [SidebarRow],
    pub selected: usize,
    pub focused: bool,
    /// Display name of the signed-in user, if any.
    pub user: Option<&'a str>,
    /// Sign-in or sign-out in flight; the auth row is shown dimmed.
    pub auth_pending: bool,
}

impl<'a> Sidebar<'a> {
    /// Index of the row drawn at screen `row`, given the sidebar `area`.
    pub fn hit_test(area: Rect, rows: usize, column: u16, row: u16) -> Option<usize> {
        let inner_top = area.y + 1;
        if column < area.x || column >= area.x + area.width || row < inner_top {
            return None;
        }
        let idx = (row - inner_top) as usize;
        (idx < rows).then_some(idx)
    }

    fn line(&self, idx: usize, row: &SidebarRow) -> Line<'a> {
        let is_auth_row = idx + 1 == self.rows.len();
        let mut style = Style::default();
        if is_auth_row {
            style = style.fg(Color::Cyan);
            if self.auth_pending {
                style = style.add_modifier(Modifier::DIM);
            }
        }
        if self.focused && idx == self.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Line::from(vec![
            Span::styled(format!(" {} ", glyph(row.icon)), style),
            Span::styled(format!("{:<width$}", row.label, width = 16), style),
        ])
    }
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::TOP | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(
                BRAND,
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.line(idx, row))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(user) = self.user
            && inner.height > self.rows.len() as u16 + 1
        {
            let footer = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" @{user}"),
                    Style::default().fg(Color::DarkGray),
                )),
                footer,
            );
        }
    }
}
