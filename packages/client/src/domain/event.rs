//! Events delivered on a room connection.

use super::{
    entity::{Member, RoomProperties},
    value_object::RoomSlug,
};

/// A decoded inbound room frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// The room's properties (sent on connect)
    Properties(RoomProperties),
    /// Someone is typing
    Typing { username: String, text: String },
    /// Full member list and add-member form
    Members { members: Vec<Member>, form: String },
    /// The conversation moved to another room
    NewRoom(RoomSlug),
    /// A chat message, live or replayed from history
    Message {
        /// `None` for system messages
        sender: Option<String>,
        text: String,
        timestamp: String,
        /// The frame's `type` tag, if it had one
        tag: Option<String>,
    },
}
