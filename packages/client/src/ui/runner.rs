//! Client entry point: wires the terminal, the prompt thread, the unread
//! tracker and the chat session together.

use std::{sync::Arc, thread};

use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::view::ChatView,
    error::ClientError,
    infrastructure::{
        ChatEndpoint,
        websocket::{ReconnectingSocket, TungsteniteConnector},
    },
    usecase::ConnectionManager,
};

use super::{prompt::read_commands, session::ChatSession, terminal::TerminalView};

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const UNREAD_CHANNEL_CAPACITY: usize = 16;

/// Run the interactive client until the user quits.
///
/// # Errors
///
/// Returns an error if the server URL is not a supported origin or the
/// prompt thread cannot be started. Connection failures after startup are
/// logged and never end the client.
pub async fn run(config: ClientConfig) -> Result<(), ClientError> {
    let endpoint = ChatEndpoint::from_page_origin(&config.server_url)?;
    let view = Arc::new(TerminalView::stdout());

    // Unread counters (independent of the open room)
    let (unread_tx, unread_rx) = mpsc::channel(UNREAD_CHANNEL_CAPACITY);
    let unread_task =
        ReconnectingSocket::new(endpoint.unread_url(), config.reconnect_interval).spawn(unread_tx);

    // Prompt
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let prompt = format!("{}> ", config.username);
    let prompt_view = view.clone();
    thread::Builder::new()
        .name("prompt".to_string())
        .spawn(move || read_commands(&prompt, &command_tx, prompt_view.as_ref()))?;

    tracing::info!(
        "Connected as '{}' to {}",
        config.username,
        config.server_url
    );
    view.notice("Type /help for the list of commands.");

    let manager = ConnectionManager::new(Arc::new(TungsteniteConnector), endpoint);
    let mut session = ChatSession::new(manager, config.username, config.typing_fade, view);
    if let Some(room) = config.room {
        session.open_room(room).await;
    }
    session.run(command_rx, unread_rx).await;

    unread_task.abort();
    tracing::info!("Bye");
    Ok(())
}
