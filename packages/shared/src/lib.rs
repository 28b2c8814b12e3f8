//! Shared utilities for the Whisper chat client.

pub mod logger;
