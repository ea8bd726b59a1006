//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop redraws conditionally:
//!
//! - **Animating** (loading notice, request in flight): draws every ~80ms so
//!   the spinner moves.
//! - **Idle**: sleeps up to 250ms and only redraws on events, background
//!   results, or an expiring notice.
//!
//! ## Background Work
//!
//! Effects returned by `update()` run on the tokio runtime via
//! `tasks::perform`. Their result actions come back over an mpsc channel
//! and are applied at the top of the next loop iteration.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;

use crate::api::HttpTweetSource;
use crate::auth::{AuthError, BrowserLauncher, GoogleProvider};
use crate::core::action::{Action, Effect, update};
use crate::core::composer::{Composer, IMAGE_PLACEHOLDER};
use crate::core::config::ResolvedConfig;
use crate::core::feed::RefreshOrigin;
use crate::core::notice::{Notice, NoticeKind};
use crate::core::sidebar::ROW_COUNT;
use crate::core::state::App;
use crate::tasks::{self, Services};
use crate::tui::component::EventHandler;
use crate::tui::components::{ComposerHit, FeedListState, InputBox, InputEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::Hit;

/// Lines of tweet text visible before the composer scrolls internally.
const COMPOSER_MAX_LINES: u16 = 4;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Composer,
    /// The image URL form; only reachable while it is open.
    ImageUrl,
    Feed,
}

impl Focus {
    fn next(self, image_form_open: bool) -> Self {
        match self {
            Focus::Sidebar => Focus::Composer,
            Focus::Composer if image_form_open => Focus::ImageUrl,
            Focus::Composer | Focus::ImageUrl => Focus::Feed,
            Focus::Feed => Focus::Sidebar,
        }
    }

    fn prev(self, image_form_open: bool) -> Self {
        match self {
            Focus::Sidebar => Focus::Feed,
            Focus::Composer => Focus::Sidebar,
            Focus::ImageUrl => Focus::Composer,
            Focus::Feed if image_form_open => Focus::ImageUrl,
            Focus::Feed => Focus::Composer,
        }
    }
}

/// Hides success and error notices after a while. Loading notices stay
/// until they are replaced.
#[derive(Debug, Default)]
pub struct NoticeTimer {
    shown: Option<(u64, NoticeKind, Instant)>,
}

impl NoticeTimer {
    /// Returns the id of the notice to dismiss, if its time is up.
    pub fn poll(&mut self, current: Option<&Notice>, ttl: Duration, now: Instant) -> Option<u64> {
        let Some(notice) = current else {
            self.shown = None;
            return None;
        };
        if notice.kind == NoticeKind::Loading {
            self.shown = None;
            return None;
        }
        match self.shown {
            Some((id, kind, since)) if id == notice.id && kind == notice.kind => {
                (now.duration_since(since) >= ttl).then_some(id)
            }
            _ => {
                self.shown = Some((notice.id, notice.kind, now));
                None
            }
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub sidebar_selected: usize,
    pub composer_input: InputBox,
    pub image_input: InputBox,
    pub feed_list: FeedListState,
    pub notice_timer: NoticeTimer,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Composer, // User expects to type immediately
            sidebar_selected: 0,
            composer_input: InputBox::new(" Tweet ", "", COMPOSER_MAX_LINES),
            image_input: InputBox::new(" Image URL ", IMAGE_PLACEHOLDER, 1),
            feed_list: FeedListState::new(),
            notice_timer: NoticeTimer::default(),
        }
    }

    /// Mirror core state into the widgets: input text (core may have reset
    /// it), placeholder for the session, and focus flags.
    pub fn sync(&mut self, app: &App) {
        self.composer_input.sync(&app.composer.text);
        self.image_input.sync(&app.composer.image_draft);
        self.composer_input.placeholder = Composer::placeholder(&app.session).to_string();

        if self.focus == Focus::ImageUrl && !app.composer.image_form_open {
            self.focus = Focus::Composer;
        }
        self.sidebar_selected = self.sidebar_selected.min(ROW_COUNT - 1);
        self.composer_input.focused = self.focus == Focus::Composer;
        self.image_input.focused = self.focus == Focus::ImageUrl;
    }
}

/// Translate one terminal event into at most one core action, updating
/// presentation state along the way.
pub fn route_event(event: &TuiEvent, app: &App, tui: &mut TuiState, area: Rect) -> Option<Action> {
    match event {
        TuiEvent::Quit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        TuiEvent::Refresh => return Some(Action::Refresh(RefreshOrigin::Manual)),
        TuiEvent::ToggleImageForm => {
            tui.focus = if app.composer.image_form_open {
                Focus::Composer
            } else {
                Focus::ImageUrl
            };
            return Some(Action::ToggleImageForm);
        }
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next(app.composer.image_form_open);
            return None;
        }
        TuiEvent::FocusPrev => {
            tui.focus = tui.focus.prev(app.composer.image_form_open);
            return None;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.feed_list.handle_event(event);
            return None;
        }
        TuiEvent::MouseClick(column, row) => {
            return route_click(ui::hit_test(area, app, tui, *column, *row), app, tui);
        }
        _ => {}
    }

    match tui.focus {
        Focus::Sidebar => match event {
            TuiEvent::CursorUp => {
                tui.sidebar_selected = tui.sidebar_selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                tui.sidebar_selected = (tui.sidebar_selected + 1).min(ROW_COUNT - 1);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => app
                .sidebar_rows()
                .get(tui.sidebar_selected)
                .map(|row| Action::Activate(row.action)),
            _ => None,
        },
        Focus::Composer => match tui.composer_input.handle_event(event)? {
            InputEvent::Submit => Some(Action::SubmitTweet),
            InputEvent::Changed(text) => Some(Action::EditText(text)),
        },
        Focus::ImageUrl => {
            if matches!(event, TuiEvent::Escape) {
                tui.focus = Focus::Composer;
                return Some(Action::ToggleImageForm);
            }
            match tui.image_input.handle_event(event)? {
                InputEvent::Submit => {
                    // Focus returns to the text once the form closes
                    Some(Action::AttachImage)
                }
                InputEvent::Changed(text) => Some(Action::EditImageDraft(text)),
            }
        }
        Focus::Feed => match event {
            TuiEvent::CursorUp => {
                tui.feed_list.select_prev(app.feed.tweets().len());
                None
            }
            TuiEvent::CursorDown => {
                tui.feed_list.select_next(app.feed.tweets().len());
                None
            }
            // Typing jumps to the composer and keeps the keystroke
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.focus = Focus::Composer;
                match tui.composer_input.handle_event(event)? {
                    InputEvent::Changed(text) => Some(Action::EditText(text)),
                    InputEvent::Submit => None,
                }
            }
            _ => None,
        },
    }
}

fn route_click(hit: Option<Hit>, app: &App, tui: &mut TuiState) -> Option<Action> {
    match hit? {
        Hit::Sidebar(idx) => {
            tui.focus = Focus::Sidebar;
            tui.sidebar_selected = idx;
            app.sidebar_rows().get(idx).map(|row| Action::Activate(row.action))
        }
        Hit::Composer(ComposerHit::Text) => {
            tui.focus = Focus::Composer;
            None
        }
        Hit::Composer(ComposerHit::ImageForm) => {
            tui.focus = Focus::ImageUrl;
            None
        }
        Hit::Composer(ComposerHit::ImageToggle) => {
            tui.focus = if app.composer.image_form_open {
                Focus::Composer
            } else {
                Focus::ImageUrl
            };
            Some(Action::ToggleImageForm)
        }
        Hit::Composer(ComposerHit::TweetButton) => Some(Action::SubmitTweet),
        Hit::Feed(row) => {
            tui.focus = Focus::Feed;
            if row.is_some() {
                tui.feed_list.selected_index = row;
            }
            None
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that lack it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build the remote collaborators from a resolved config.
pub fn build_services(config: &ResolvedConfig) -> std::io::Result<Services> {
    let source = HttpTweetSource::new(config.api_base_url.clone()).map_err(std::io::Error::other)?;
    let mut provider = GoogleProvider::new(config.google.clone());
    if !config.open_browser {
        let launcher: BrowserLauncher = Arc::new(|url: &str| -> Result<(), AuthError> {
            info!("Browser launch disabled; open this URL to sign in: {url}");
            Ok(())
        });
        provider = provider.with_launcher(launcher);
    }
    Ok(Services::new(Arc::new(source), Arc::new(provider)))
}

/// Apply an action locally and start whatever effect it asks for.
/// Returns `true` when the app should quit.
fn apply(app: &mut App, action: Action, services: &Services, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::None => false,
        effect => {
            spawn_effect(effect, services, tx);
            false
        }
    }
}

fn spawn_effect(effect: Effect, services: &Services, tx: &mpsc::Sender<Action>) {
    debug!("Spawning effect: {:?}", effect);
    let services = services.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(action) = tasks::perform(effect, &services).await
            && tx.send(action).is_err()
        {
            warn!("Failed to deliver effect result: receiver dropped");
        }
    });
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let services = build_services(&config)?;
    let mut app = App::new();
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if config.refresh_on_start {
        apply(&mut app, Action::Refresh(RefreshOrigin::Startup), &services, &tx);
    }

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync(&app);

        let animating = app
            .notices
            .current()
            .is_some_and(|n| n.kind == NoticeKind::Loading)
            || app.composer.posting
            || app.auth_pending
            || (app.feed.is_refreshing() && app.feed.tweets().is_empty());
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        if let Some(id) =
            tui.notice_timer
                .poll(app.notices.current(), config.notification_ttl, Instant::now())
        {
            update(&mut app, Action::DismissNotice(id));
            needs_redraw = true;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let area = terminal.get_frame().area();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&event, &app, &mut tui, area) else {
                continue;
            };
            if apply(&mut app, action, &services, &tx) {
                break 'main;
            }
            // Keep widgets in step with core between events of one batch
            tui.sync(&app);
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply(&mut app, action, &services, &tx) {
                break 'main;
            }
        }
    }

    info!("Chirp shutting down");
    ratatui::restore();
    Ok(())
}
