//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomSlug validation error
    #[error("RoomSlug cannot be empty")]
    RoomSlugEmpty,

    /// RoomSlug must fit in a single path segment
    #[error("RoomSlug cannot contain '/' (got: {0})")]
    RoomSlugInvalidFormat(String),

    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// Numeric identifier parse error
    #[error("Identifier must be a non-negative integer (got: {0})")]
    IdInvalidFormat(String),

    /// MessageText validation error
    #[error("MessageText cannot be empty")]
    MessageTextEmpty,

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Errors raised by a room or unread socket
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The WebSocket handshake failed
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The socket is closed or closing
    #[error("Connection is not open")]
    NotOpen,

    /// Writing a frame failed
    #[error("Failed to send frame: {0}")]
    Send(String),
}
