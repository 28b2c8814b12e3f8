//! Domain layer for the chat client.
//!
//! This module contains the client's state rules and the ports (presentation
//! and room connection) that the use case layer drives. It is independent of
//! the wire format and of any concrete socket or terminal.

pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod typing;
pub mod value_object;
pub mod view;

pub use connection::{RoomConnector, RoomSocket, SocketEvent};
pub use entity::{
    ChatLine, Member, MessageKind, RoomEntry, RoomList, RoomProperties, UnreadState,
    member_count_label,
};
pub use error::{TransportError, ValueObjectError};
pub use event::RoomEvent;
pub use typing::{TypingIndicator, TypingTransition};
pub use value_object::{MessageText, RoomId, RoomSlug, UserId, Username};
pub use view::ChatView;

#[cfg(test)]
pub use view::MockChatView;
