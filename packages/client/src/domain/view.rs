//! Presentation port.
//!
//! Every visible effect of the chat client goes through [`ChatView`]. The
//! terminal renderer implements it for the binary; tests use the mockall
//! generated `MockChatView`.

use super::{
    entity::{ChatLine, Member, RoomEntry},
    value_object::{RoomId, UserId},
};

/// The surfaces a chat client renders to
#[cfg_attr(test, mockall::automock)]
pub trait ChatView: Send + Sync {
    // room view

    /// Show the open room's display name.
    fn set_room_title(&self, title: &str);

    /// Show the pluralized member count.
    fn set_member_count(&self, label: &str);

    /// Show or hide the leave-room action.
    fn set_leave_visible(&self, visible: bool);

    /// Drop all rendered messages.
    fn clear_messages(&self);

    /// Append a message and scroll to it.
    fn append_message(&self, line: &ChatLine);

    /// Show the typing text of another user.
    fn show_typing(&self, text: &str);

    /// Hide the typing text.
    fn hide_typing(&self);

    /// Clear the room view after the room is closed.
    fn clear_room(&self);

    // member panel

    /// Replace the member list and the add-member form.
    fn replace_members(&self, members: &[Member], form: &str);

    fn remove_member_entry(&self, user_id: UserId);

    // room list

    fn insert_room_entry(&self, entry: &RoomEntry);

    fn remove_room_entry(&self, room_id: RoomId);

    // unread badges

    /// Set the total unread badge. `None` clears it.
    fn set_unread_total(&self, count: Option<u64>);

    /// Set the rooms-with-unread badge. `None` clears it.
    fn set_unread_rooms(&self, count: Option<usize>);

    /// Remove the unread highlight from every room-list entry.
    fn clear_room_highlights(&self);

    /// Highlight a room-list entry and set its per-room badge.
    fn highlight_room(&self, room_id: RoomId, unread: u64);

    // feedback

    /// Tell the user something went wrong.
    fn alert(&self, message: &str);

    /// Show informational text, e.g. prompt help.
    fn notice(&self, message: &str);
}
