//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created fresh each frame with everything they draw:
//! - `TitleBar`: page title and the current notice
//! - `Sidebar`: navigation rows and the signed-in user
//! - `TweetRow`: a single tweet
//!
//! ### Stateful Components (Event-Driven)
//!
//! Hold state across frames and turn `TuiEvent`s into higher-level events:
//! - `InputBox`: wrapping text field, used twice by the composer
//! - `FeedList`: scrollable tweet list with layout caching
//! - `ComposerPanel`: lays out the composer's inputs and toolbar
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props instead of reaching into
//! `App`, so dependencies stay explicit:
//!
//! ```rust,ignore
//! TitleBar::new(app.notices.current(), spinner_frame).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (header + notice)
//! ├── sidebar.rs       (navigation rail)
//! ├── composer.rs      (new tweet panel)
//! ├── tweet_row.rs     (single tweet renderer)
//! ├── feed_list.rs     (scrollable tweet container)
//! └── input_box/       (text input)
//! ```

pub mod composer;
pub mod feed_list;
pub mod input_box;
pub mod sidebar;
pub mod title_bar;
pub mod tweet_row;

pub use composer::{ComposerHit, ComposerLayout, ComposerPanel};
pub use feed_list::{FeedList, FeedListState};
pub use input_box::{InputBox, InputEvent};
pub use sidebar::{SIDEBAR_WIDTH, Sidebar};
pub use title_bar::TitleBar;
