//! Core domain models for the chat client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value_object::{RoomId, RoomSlug, UserId, Username};

/// Sender label shown for messages without a sender.
pub const SYSTEM_SENDER_LABEL: &str = "System";

/// Message tag the server uses for live chat messages.
///
/// Only live messages scroll with animation; history replayed on connect
/// jumps straight to the bottom.
pub const LIVE_MESSAGE_TAG: &str = "chat_message";

/// Properties of the currently open room, as announced by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomProperties {
    /// Room identifier
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Slug used to build the socket URL
    pub slug: RoomSlug,
    /// Server-formatted last modification time
    pub modified: String,
    /// Number of members in the room
    pub user_count: u64,
    /// Direct conversation between two users
    pub is_user_to_user: bool,
}

impl RoomProperties {
    /// Leaving is only offered for group rooms.
    pub fn leave_visible(&self) -> bool {
        !self.is_user_to_user
    }

    /// Pluralized member count, e.g. `1 member` or `3 members`.
    pub fn member_count_label(&self) -> String {
        member_count_label(self.user_count)
    }

    /// Room-list entry for this room.
    pub fn to_entry(&self) -> RoomEntry {
        RoomEntry {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            modified: self.modified.clone(),
        }
    }
}

/// Pluralized member count text.
pub fn member_count_label(count: u64) -> String {
    let noun = if count == 1 { "member" } else { "members" };
    format!("{count} {noun}")
}

/// One entry of the room list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    pub id: RoomId,
    pub name: String,
    pub slug: RoomSlug,
    pub modified: String,
}

/// The rooms known to the room list, keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct RoomList {
    entries: BTreeMap<RoomId, RoomEntry>,
}

impl RoomList {
    /// Create an empty room list
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` unless an entry with the same identifier exists.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert_if_absent(&mut self, entry: RoomEntry) -> bool {
        if self.entries.contains_key(&entry.id) {
            return false;
        }
        self.entries.insert(entry.id, entry);
        true
    }

    /// Remove the entry for `id`, returning it if it was present
    pub fn remove(&mut self, id: RoomId) -> Option<RoomEntry> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Who a chat line came from, relative to the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Sent by the local user
    Own,
    /// Sent by another user
    Other,
    /// Generated by the server (no sender)
    System,
}

impl MessageKind {
    /// Classify a sender against the local user. No sender means a system message.
    pub fn classify(local_user: &Username, sender: Option<&str>) -> Self {
        match sender {
            None => Self::System,
            Some(name) if local_user.is(name) => Self::Own,
            Some(_) => Self::Other,
        }
    }
}

/// A chat message ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub kind: MessageKind,
    /// Sender name, or [`SYSTEM_SENDER_LABEL`] for system messages
    pub sender: String,
    pub text: String,
    /// Server-formatted timestamp
    pub timestamp: String,
    /// Whether the view should scroll with animation
    pub animated: bool,
}

impl ChatLine {
    /// Build a chat line from the raw message fields.
    ///
    /// # Arguments
    ///
    /// * `local_user` - The local user, used for classification
    /// * `sender` - The `username` field of the frame, `None` for system messages
    /// * `text` - The message body
    /// * `timestamp` - The server-formatted timestamp
    /// * `tag` - The frame's `type` tag, if any
    pub fn new(
        local_user: &Username,
        sender: Option<String>,
        text: String,
        timestamp: String,
        tag: Option<&str>,
    ) -> Self {
        let kind = MessageKind::classify(local_user, sender.as_deref());
        let sender = sender.unwrap_or_else(|| SYSTEM_SENDER_LABEL.to_string());
        Self {
            kind,
            sender,
            text,
            timestamp,
            animated: tag == Some(LIVE_MESSAGE_TAG),
        }
    }
}

/// A room member as listed in the member panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    /// Pre-rendered markup supplied by the server, if any
    pub html: Option<String>,
}

/// Unread counters for the current user.
///
/// Always rebuilt from a full server update; never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnreadState {
    total: u64,
    rooms: BTreeMap<RoomId, u64>,
}

impl UnreadState {
    /// Create the state from the total and per-room counts
    pub fn new(total: u64, rooms: impl IntoIterator<Item = (RoomId, u64)>) -> Self {
        Self {
            total,
            rooms: rooms.into_iter().collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Total badge value; `None` clears the badge.
    pub fn total_badge(&self) -> Option<u64> {
        (self.total > 0).then_some(self.total)
    }

    /// Rooms-with-unread badge value; `None` clears the badge.
    pub fn rooms_badge(&self) -> Option<usize> {
        (!self.rooms.is_empty()).then_some(self.rooms.len())
    }

    /// Per-room unread counts, ordered by room identifier
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, u64)> + '_ {
        self.rooms.iter().map(|(id, count)| (*id, *count))
    }

    pub fn unread_in(&self, id: RoomId) -> Option<u64> {
        self.rooms.get(&id).copied()
    }
}
