//! Terminal chat client for Whisper rooms.
//!
//! One WebSocket connection per open room carries chat messages, typing
//! notices and member lists; a second, auto-reconnecting connection keeps the
//! unread counters up to date.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod test_support;

// Re-export entry point
pub use ui::run as run_client;
