use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive data as props (struct fields), may borrow persistent
/// state through `&mut` fields, and render into a `Rect` of the frame.
///
/// `render` takes `&mut self` so a component can refresh caches (row
/// heights, cursor scroll) while it draws, in the spirit of ratatui's
/// `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
