//! The chat session event loop.
//!
//! User commands, room socket frames, unread updates and the typing fade
//! deadline are all handled here, one at a time, in the order they arrive.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};

use crate::{
    domain::{ChatView, RoomSlug, SocketEvent, UnreadState, Username},
    infrastructure::dto::websocket::{UnreadUpdateDto, parse_room_event},
    usecase::{
        ConnectionManager, DispatchOutcome, MessageDispatcher, SendCommandError,
        SendCommandUseCase, SendOutcome, TrackUnreadUseCase, UserIntent,
    },
};

use super::command::{HELP, UserCommand};

/// Owns the room connection and all client-side chat state
pub struct ChatSession<V: ChatView> {
    manager: ConnectionManager,
    dispatcher: MessageDispatcher,
    unread: UnreadState,
    view: Arc<V>,
}

impl<V: ChatView> ChatSession<V> {
    pub fn new(
        manager: ConnectionManager,
        local_user: Username,
        typing_fade: Duration,
        view: Arc<V>,
    ) -> Self {
        Self {
            manager,
            dispatcher: MessageDispatcher::new(local_user, typing_fade),
            unread: UnreadState::default(),
            view,
        }
    }

    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Switch to `slug`, closing the current room first.
    ///
    /// A failed connect is logged and leaves no room open.
    pub async fn open_room(&mut self, slug: RoomSlug) {
        self.dispatcher.reset_room(self.view.as_ref());
        match self.manager.open_room(slug.clone()).await {
            Ok(_) => self.view.clear_messages(),
            Err(e) => {
                tracing::error!("Failed to open room '{}': {}", slug, e);
                self.view.clear_room();
            }
        }
    }

    pub async fn close_room(&mut self) {
        if self.manager.close_room().await {
            self.dispatcher.reset_room(self.view.as_ref());
            self.view.clear_room();
        }
    }

    /// Handle one prompt command. `Break` ends the session.
    pub async fn handle_command(&mut self, command: UserCommand) -> ControlFlow<()> {
        match command {
            UserCommand::Say(text) => {
                self.send(&UserIntent::SendMessage(text));
            }
            UserCommand::Typing => {
                self.send(&UserIntent::Typing);
            }
            UserCommand::TypingPing => {
                if self.manager.is_ready() {
                    self.send(&UserIntent::Typing);
                }
            }
            UserCommand::Members => {
                self.send(&UserIntent::RequestMembers);
            }
            UserCommand::Add(user_ids) => {
                self.send(&UserIntent::AddMembers(user_ids));
            }
            UserCommand::Remove(user_id) => {
                if self.send(&UserIntent::RemoveMember(user_id)) == Some(SendOutcome::Sent) {
                    self.view.remove_member_entry(user_id);
                }
            }
            UserCommand::Leave => self.leave_room().await,
            UserCommand::Open(slug) => self.open_room(slug).await,
            UserCommand::Close => self.close_room().await,
            UserCommand::Help => self.view.notice(HELP),
            UserCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn send(&mut self, intent: &UserIntent) -> Option<SendOutcome> {
        match SendCommandUseCase::new(&mut self.manager).execute(intent) {
            Ok(outcome) => Some(outcome),
            Err(SendCommandError::NotConnected) => {
                tracing::warn!("Dropped {:?}: not connected", intent);
                self.view.alert(&SendCommandError::NotConnected.to_string());
                None
            }
            Err(e @ SendCommandError::InvalidMessage(_)) => {
                tracing::warn!("Rejected message: {}", e);
                self.view.alert(&e.to_string());
                None
            }
            Err(e) => {
                tracing::error!("Failed to send {:?}: {}", intent, e);
                self.view.alert(&e.to_string());
                None
            }
        }
    }

    async fn leave_room(&mut self) {
        let room_id = self.manager.open_room_id();
        if self.send(&UserIntent::LeaveRoom).is_none() {
            return;
        }
        if let Some(room_id) = room_id {
            self.dispatcher.forget_room(room_id, self.view.as_ref());
        }
        self.close_room().await;
    }

    /// Handle one event from the room socket.
    pub async fn handle_socket_event(&mut self, event: SocketEvent) {
        let text = match event {
            SocketEvent::Frame(text) => text,
            SocketEvent::Closed => {
                tracing::info!("Chat socket closed");
                return;
            }
        };
        let event = match parse_room_event(&text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping malformed frame: {} ({})", e, text);
                return;
            }
        };

        match self
            .dispatcher
            .dispatch(event, Instant::now(), self.view.as_ref())
        {
            DispatchOutcome::RoomProperties(properties) => {
                if let Some(connection) = self.manager.active_mut() {
                    connection.apply_properties(&properties);
                }
                // The open room is never highlighted
                if self.unread != UnreadState::default() {
                    self.render_unread();
                }
            }
            DispatchOutcome::SwitchRoom(slug) => self.open_room(slug).await,
            DispatchOutcome::Rendered | DispatchOutcome::Ignored => {}
        }
    }

    /// Handle one frame from the unread counter socket.
    pub fn handle_unread(&mut self, text: &str) {
        match UnreadUpdateDto::parse(text) {
            Ok(update) => {
                self.unread = update.into();
                self.render_unread();
            }
            Err(e) => tracing::warn!("Skipping malformed unread update: {} ({})", e, text),
        }
    }

    fn render_unread(&self) {
        let highlighted = TrackUnreadUseCase::new(self.view.as_ref())
            .execute(&self.unread, self.manager.open_room_id());
        tracing::debug!(
            "Unread: {} messages, {} rooms highlighted",
            self.unread.total(),
            highlighted
        );
    }

    /// Run until `/quit` or until the command channel closes, then close the
    /// open room.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<UserCommand>,
        mut unread: mpsc::Receiver<String>,
    ) {
        let mut unread_open = true;
        loop {
            let deadline = self.dispatcher.typing_deadline();
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Command channel closed");
                        break;
                    };
                    if self.handle_command(command).await.is_break() {
                        break;
                    }
                }
                event = self.manager.next_event() => self.handle_socket_event(event).await,
                update = unread.recv(), if unread_open => match update {
                    Some(text) => self.handle_unread(&text),
                    None => unread_open = false,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.dispatcher.fade_typing(Instant::now(), self.view.as_ref());
                }
            }
        }
        self.close_room().await;
    }
}
