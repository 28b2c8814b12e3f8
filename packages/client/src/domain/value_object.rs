//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::error::ValueObjectError;

/// Maximum accepted username length.
pub const USERNAME_MAX_LEN: usize = 150;

/// Maximum accepted message length, in characters.
pub const MESSAGE_TEXT_MAX_LEN: usize = 10000;

/// Room identifier value object.
///
/// The server's primary key for a room. Room-list entries and unread
/// counters are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(u64);

impl RoomId {
    /// Create a new RoomId.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier value object.
///
/// Used by member management commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Create a new UserId.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for UserId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValueObjectError::IdInvalidFormat(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room slug value object.
///
/// The slug is the last path segment of the room socket URL
/// (`/ws/chat/{slug}/`), so it may not be empty or contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomSlug(String);

impl RoomSlug {
    /// Create a new RoomSlug.
    ///
    /// # Arguments
    ///
    /// * `slug` - The room slug string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomSlug or an error if validation fails
    pub fn new(slug: String) -> Result<Self, ValueObjectError> {
        if slug.is_empty() {
            return Err(ValueObjectError::RoomSlugEmpty);
        }
        if slug.contains('/') {
            return Err(ValueObjectError::RoomSlugInvalidFormat(slug));
        }
        Ok(Self(slug))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomSlug {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomSlug> for String {
    fn from(value: RoomSlug) -> Self {
        value.0
    }
}

impl fmt::Display for RoomSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username value object.
///
/// The local user's name, compared against the sender of incoming
/// messages and typing notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = name.chars().count();
        if len > USERNAME_MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong {
                max: USERNAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `sender` names this user.
    pub fn is(&self, sender: &str) -> bool {
        self.0 == sender
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outgoing message text value object.
///
/// Surrounding whitespace is trimmed on construction; what remains must be
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText from raw user input.
    ///
    /// # Arguments
    ///
    /// * `raw` - The text as typed, before trimming
    ///
    /// # Returns
    ///
    /// A Result containing the trimmed MessageText or an error if nothing is
    /// left after trimming or the text is too long
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = text.chars().count();
        if len > MESSAGE_TEXT_MAX_LEN {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(text.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
