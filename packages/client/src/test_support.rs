//! Test doubles for the room connection and presentation ports.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{
    ChatLine, ChatView, Member, RoomConnector, RoomEntry, RoomId, RoomSocket, SocketEvent,
    TransportError, UserId,
};

/// Ordered log shared by a connector and its sockets
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default)]
struct FakeSocketState {
    open: bool,
    sent: Vec<String>,
}

/// The server side of a fake socket
#[derive(Clone)]
pub struct FakeRemote {
    pub url: String,
    events: mpsc::UnboundedSender<SocketEvent>,
    state: Arc<Mutex<FakeSocketState>>,
}

impl FakeRemote {
    /// Deliver a text frame to the client.
    pub fn push(&self, text: &str) {
        self.events
            .send(SocketEvent::Frame(text.to_string()))
            .unwrap();
    }

    /// Simulate the server closing the connection.
    pub fn disconnect(&self) {
        self.state.lock().unwrap().open = false;
        self.events.send(SocketEvent::Closed).unwrap();
    }

    /// Frames the client sent, in order.
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }
}

pub struct FakeSocket {
    url: String,
    state: Arc<Mutex<FakeSocketState>>,
    events: mpsc::UnboundedReceiver<SocketEvent>,
    log: CallLog,
}

#[async_trait]
impl RoomSocket for FakeSocket {
    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.sent.push(text);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<SocketEvent> {
        self.events.recv().await
    }

    async fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        if state.open {
            state.open = false;
            self.log.lock().unwrap().push(format!("close {}", self.url));
        }
    }
}

/// Connector handing out [`FakeSocket`]s and keeping their remotes
#[derive(Default)]
pub struct FakeConnector {
    log: CallLog,
    remotes: Mutex<Vec<FakeRemote>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make connections to `url` fail.
    pub fn fail_on(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    /// The remote of the `index`-th successful connection.
    pub fn remote(&self, index: usize) -> FakeRemote {
        self.remotes.lock().unwrap()[index].clone()
    }

    /// Opens and closes, in order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoomConnector for FakeConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn RoomSocket>, TransportError> {
        if self.failing.lock().unwrap().contains(url) {
            self.log.lock().unwrap().push(format!("fail {url}"));
            return Err(TransportError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(FakeSocketState {
            open: true,
            sent: Vec::new(),
        }));
        self.remotes.lock().unwrap().push(FakeRemote {
            url: url.to_string(),
            events: events_tx,
            state: state.clone(),
        });
        self.log.lock().unwrap().push(format!("open {url}"));
        Ok(Box::new(FakeSocket {
            url: url.to_string(),
            state,
            events: events_rx,
            log: self.log.clone(),
        }))
    }
}

/// View recording every call as a short line
#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<String>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Return and forget the calls recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChatView for RecordingView {
    fn set_room_title(&self, title: &str) {
        self.record(format!("title {title}"));
    }

    fn set_member_count(&self, label: &str) {
        self.record(format!("member_count {label}"));
    }

    fn set_leave_visible(&self, visible: bool) {
        self.record(format!("leave_visible {visible}"));
    }

    fn clear_messages(&self) {
        self.record("clear_messages".to_string());
    }

    fn append_message(&self, line: &ChatLine) {
        self.record(format!(
            "message {:?} {}: {}",
            line.kind, line.sender, line.text
        ));
    }

    fn show_typing(&self, text: &str) {
        self.record(format!("show_typing {text}"));
    }

    fn hide_typing(&self) {
        self.record("hide_typing".to_string());
    }

    fn clear_room(&self) {
        self.record("clear_room".to_string());
    }

    fn replace_members(&self, members: &[Member], _form: &str) {
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        self.record(format!("members {}", names.join(",")));
    }

    fn remove_member_entry(&self, user_id: UserId) {
        self.record(format!("remove_member {user_id}"));
    }

    fn insert_room_entry(&self, entry: &RoomEntry) {
        self.record(format!("room_entry {}", entry.id));
    }

    fn remove_room_entry(&self, room_id: RoomId) {
        self.record(format!("remove_room_entry {room_id}"));
    }

    fn set_unread_total(&self, count: Option<u64>) {
        self.record(format!("unread_total {count:?}"));
    }

    fn set_unread_rooms(&self, count: Option<usize>) {
        self.record(format!("unread_rooms {count:?}"));
    }

    fn clear_room_highlights(&self) {
        self.record("clear_highlights".to_string());
    }

    fn highlight_room(&self, room_id: RoomId, unread: u64) {
        self.record(format!("highlight {room_id} {unread}"));
    }

    fn alert(&self, message: &str) {
        self.record(format!("alert {message}"));
    }

    fn notice(&self, message: &str) {
        self.record(format!("notice {message}"));
    }
}
