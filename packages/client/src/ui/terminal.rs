//! Line-oriented terminal renderer for [`ChatView`].

use std::{
    collections::BTreeMap,
    fmt,
    io::{self, Write},
    sync::Mutex,
};

use crate::domain::{ChatLine, ChatView, Member, MessageKind, RoomEntry, RoomId, UserId};

#[derive(Debug, Default)]
struct TerminalState {
    typing: Option<String>,
    leave_visible: bool,
    unread_total: Option<u64>,
    unread_rooms: Option<usize>,
    rooms: BTreeMap<RoomId, RoomEntry>,
    highlights: BTreeMap<RoomId, u64>,
}

/// Renders chat events as plain lines on a writer (stdout in the binary).
///
/// A terminal cannot take text back, so hiding and clearing only update the
/// internal state; later output reflects it.
pub struct TerminalView<W: Write + Send> {
    inner: Mutex<(W, TerminalState)>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new((writer, TerminalState::default())),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut W, &mut TerminalState) -> R) -> Option<R> {
        match self.inner.lock() {
            Ok(mut guard) => {
                let (writer, state) = &mut *guard;
                Some(f(writer, state))
            }
            Err(_) => {
                tracing::error!("Terminal view lock poisoned");
                None
            }
        }
    }

    fn line(&self, args: fmt::Arguments<'_>) {
        self.with_state(|writer, _| write_line(writer, args));
    }
}

fn write_line<W: Write>(writer: &mut W, args: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(writer, "{args}").and_then(|()| writer.flush()) {
        tracing::warn!("Failed to write to terminal: {}", e);
    }
}

fn format_chat_line(line: &ChatLine) -> String {
    match line.kind {
        MessageKind::Own => format!("[{}] {} (you): {}", line.timestamp, line.sender, line.text),
        MessageKind::Other => format!("[{}] {}: {}", line.timestamp, line.sender, line.text),
        MessageKind::System => format!("[{}] * {}: {}", line.timestamp, line.sender, line.text),
    }
}

fn badge<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn set_room_title(&self, title: &str) {
        self.line(format_args!("== {title} =="));
    }

    fn set_member_count(&self, label: &str) {
        self.line(format_args!("   {label}"));
    }

    fn set_leave_visible(&self, visible: bool) {
        self.with_state(|writer, state| {
            if visible && !state.leave_visible {
                write_line(writer, format_args!("   (/leave to leave this room)"));
            }
            state.leave_visible = visible;
        });
    }

    fn clear_messages(&self) {
        self.line(format_args!("----"));
    }

    fn append_message(&self, line: &ChatLine) {
        self.with_state(|writer, state| {
            // A message from the typist supersedes the typing notice
            state.typing = None;
            write_line(writer, format_args!("{}", format_chat_line(line)));
        });
    }

    fn show_typing(&self, text: &str) {
        self.with_state(|writer, state| {
            if state.typing.as_deref() != Some(text) {
                write_line(writer, format_args!("   ... {text}"));
                state.typing = Some(text.to_string());
            }
        });
    }

    fn hide_typing(&self) {
        self.with_state(|_, state| state.typing = None);
    }

    fn clear_room(&self) {
        self.with_state(|writer, state| {
            state.typing = None;
            state.leave_visible = false;
            write_line(writer, format_args!("(room closed)"));
        });
    }

    fn replace_members(&self, members: &[Member], _form: &str) {
        self.with_state(|writer, _| {
            write_line(writer, format_args!("Members ({}):", members.len()));
            for member in members {
                write_line(writer, format_args!("  #{} {}", member.id, member.name));
            }
        });
    }

    fn remove_member_entry(&self, user_id: UserId) {
        self.line(format_args!("Removed member #{user_id}"));
    }

    fn insert_room_entry(&self, entry: &RoomEntry) {
        self.with_state(|writer, state| {
            write_line(
                writer,
                format_args!(
                    "+ {} ({}) last active {}",
                    entry.name, entry.slug, entry.modified
                ),
            );
            state.rooms.insert(entry.id, entry.clone());
        });
    }

    fn remove_room_entry(&self, room_id: RoomId) {
        self.with_state(|writer, state| {
            if let Some(entry) = state.rooms.remove(&room_id) {
                write_line(writer, format_args!("- {} ({})", entry.name, entry.slug));
            }
            state.highlights.remove(&room_id);
        });
    }

    fn set_unread_total(&self, count: Option<u64>) {
        self.with_state(|_, state| state.unread_total = count);
    }

    fn set_unread_rooms(&self, count: Option<usize>) {
        self.with_state(|writer, state| {
            state.unread_rooms = count;
            write_line(
                writer,
                format_args!(
                    "Unread: {} messages in {} rooms",
                    badge(state.unread_total),
                    badge(state.unread_rooms)
                ),
            );
        });
    }

    fn clear_room_highlights(&self) {
        self.with_state(|_, state| state.highlights.clear());
    }

    fn highlight_room(&self, room_id: RoomId, unread: u64) {
        self.with_state(|writer, state| {
            state.highlights.insert(room_id, unread);
            let name = state
                .rooms
                .get(&room_id)
                .map_or_else(|| format!("room #{room_id}"), |entry| entry.name.clone());
            write_line(writer, format_args!("   {name}: {unread} unread"));
        });
    }

    fn alert(&self, message: &str) {
        self.line(format_args!("! {message}"));
    }

    fn notice(&self, message: &str) {
        self.line(format_args!("{message}"));
    }
}
