//! # Core Application Logic
//!
//! Chirp's business rules: who is signed in, what the feed shows, what
//! the composer will post. Terminal and HTTP details live elsewhere.
//!
//! ```text
//!        keys, clicks, results ──Action──▶ update(&mut App)
//!                                              │
//!                                              ▼
//!                          ┌──────────────────────────────────┐
//!                          │ App: session, feed, composer,    │
//!                          │      notices                     │
//!                          └──────────────────┬───────────────┘
//!                                             │ Effect
//!                 ┌───────────────────────────┴──┐
//!                 ▼                              ▼
//!          ┌────────────┐                 ┌────────────┐
//!          │    TUI     │ ──spawns──▶     │   tasks    │
//!          │  Adapter   │ ◀──Action──     │ (api/auth) │
//!          └────────────┘                 └────────────┘
//! ```
//!
//! Nothing in here performs I/O; remote calls are described as `Effect`s
//! and their outcomes come back as actions.
//!
//! ## Modules
//!
//! - [`state`]: `App`, the root of all domain state
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`feed`], [`composer`], [`sidebar`], [`notice`]: the pieces of `App`
//! - [`config`]: layered configuration

pub mod action;
pub mod composer;
pub mod config;
pub mod feed;
pub mod notice;
pub mod sidebar;
pub mod state;
