//! Chirp library exports for testing

pub mod api;
pub mod auth;
pub mod core;
pub mod tasks;
pub mod tui;

#[cfg(test)]
pub mod test_support;
