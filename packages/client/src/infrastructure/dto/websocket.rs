//! WebSocket frame DTOs for the chat protocol.
//!
//! Inbound room frames are discriminated by an optional `type` field; a
//! missing or unrecognized `type` means a chat message. Outbound frames are
//! either a bare `{"message": ...}` or a typed command.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    Member, RoomEvent, RoomId, RoomProperties, RoomSlug, UnreadState, UserId, ValueObjectError,
};

/// Inbound frame type tags
pub mod frame_type {
    pub const ROOM_PROPERTIES: &str = "room_properties";
    pub const USER_TYPING: &str = "user_typing";
    pub const ROOM_MEMBERS: &str = "room_members";
    pub const NEW_ROOM: &str = "new_room";
}

/// Errors decoding an inbound frame
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame is not a JSON object")]
    NotAnObject,

    #[error("Invalid '{kind}' frame: {source}")]
    Payload {
        kind: String,
        source: serde_json::Error,
    },

    #[error("Invalid value in frame: {0}")]
    Value(#[from] ValueObjectError),
}

/// `room_properties` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPropertiesDto {
    pub room_id: u64,
    pub room_name: String,
    pub user_count: u64,
    pub room_slug: String,
    #[serde(default)]
    pub room_modified: String,
    #[serde(default)]
    pub is_user_to_user: bool,
}

/// `user_typing` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTypingDto {
    pub username: String,
    pub text: String,
}

/// One entry of a `room_members` frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub html: Option<String>,
}

/// `room_members` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMembersDto {
    pub members: Vec<MemberDto>,
    #[serde(default)]
    pub form: String,
}

/// `new_room` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomDto {
    pub slug: String,
}

/// Chat message payload (`type` absent or any other tag)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub message: String,
    /// `null` for system messages
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl TryFrom<RoomPropertiesDto> for RoomProperties {
    type Error = ValueObjectError;

    fn try_from(dto: RoomPropertiesDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RoomId::new(dto.room_id),
            name: dto.room_name,
            slug: RoomSlug::new(dto.room_slug)?,
            modified: dto.room_modified,
            user_count: dto.user_count,
            is_user_to_user: dto.is_user_to_user,
        })
    }
}

impl From<MemberDto> for Member {
    fn from(dto: MemberDto) -> Self {
        Self {
            id: UserId::new(dto.id),
            name: dto.name,
            html: dto.html,
        }
    }
}

fn payload<T: for<'de> Deserialize<'de>>(kind: &str, value: Value) -> Result<T, FrameError> {
    serde_json::from_value(value).map_err(|source| FrameError::Payload {
        kind: kind.to_string(),
        source,
    })
}

/// Decode one inbound room frame.
///
/// # Errors
///
/// * `FrameError::Json` / `FrameError::NotAnObject` for undecodable text
/// * `FrameError::Payload` when the fields do not match the `type`
/// * `FrameError::Value` when a field fails domain validation
pub fn parse_room_event(text: &str) -> Result<RoomEvent, FrameError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(FrameError::NotAnObject);
    }
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    let event = match tag.as_deref() {
        Some(frame_type::ROOM_PROPERTIES) => {
            let dto: RoomPropertiesDto = payload(frame_type::ROOM_PROPERTIES, value)?;
            RoomEvent::Properties(dto.try_into()?)
        }
        Some(frame_type::USER_TYPING) => {
            let dto: UserTypingDto = payload(frame_type::USER_TYPING, value)?;
            RoomEvent::Typing {
                username: dto.username,
                text: dto.text,
            }
        }
        Some(frame_type::ROOM_MEMBERS) => {
            let dto: RoomMembersDto = payload(frame_type::ROOM_MEMBERS, value)?;
            RoomEvent::Members {
                members: dto.members.into_iter().map(Member::from).collect(),
                form: dto.form,
            }
        }
        Some(frame_type::NEW_ROOM) => {
            let dto: NewRoomDto = payload(frame_type::NEW_ROOM, value)?;
            RoomEvent::NewRoom(RoomSlug::new(dto.slug)?)
        }
        _ => {
            let dto: ChatMessageDto = payload("chat message", value)?;
            RoomEvent::Message {
                sender: dto.username,
                text: dto.message,
                timestamp: dto.timestamp,
                tag,
            }
        }
    };
    Ok(event)
}

/// Typed outbound commands, serialized with a `type` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandFrame {
    UserTyping,
    LeaveRoom,
    RemoveMember { user_id: UserId },
    AddMembers { user_ids: Vec<UserId> },
    RoomMembers,
}

/// An outbound room frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    /// Plain chat message; carries no `type`
    Message { message: String },
    Command(CommandFrame),
}

impl OutboundFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One room in an unread update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadRoomDto {
    pub pk: u64,
    pub unread_messages: u64,
}

/// Full unread-counter update from the unread socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadUpdateDto {
    pub unread_messages: u64,
    #[serde(default)]
    pub unread_rooms: Vec<UnreadRoomDto>,
}

impl UnreadUpdateDto {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl From<UnreadUpdateDto> for UnreadState {
    fn from(dto: UnreadUpdateDto) -> Self {
        UnreadState::new(
            dto.unread_messages,
            dto.unread_rooms
                .into_iter()
                .map(|room| (RoomId::new(room.pk), room.unread_messages)),
        )
    }
}
