//! Room connection port.
//!
//! The use case layer opens, uses and closes room sockets only through these
//! traits; the WebSocket implementation lives in the infrastructure layer.

use async_trait::async_trait;

use super::error::TransportError;

/// Something that happened on a room socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// A text frame arrived
    Frame(String),
    /// The remote side closed the socket or the stream failed
    Closed,
}

/// A live room socket
#[async_trait]
pub trait RoomSocket: Send {
    /// Whether frames can currently be sent.
    fn is_open(&self) -> bool;

    /// Queue a text frame for sending.
    ///
    /// # Errors
    ///
    /// * `TransportError::NotOpen` if the socket is closed
    /// * `TransportError::Send` if the writer has gone away
    fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Wait for the next event. Returns `None` once no more events will arrive.
    ///
    /// Must be cancel safe: it is polled inside `tokio::select!`.
    async fn next_event(&mut self) -> Option<SocketEvent>;

    /// Close the socket. Idempotent.
    async fn close(&mut self);
}

/// Opens room sockets
#[async_trait]
pub trait RoomConnector: Send + Sync {
    /// Connect to `url` and complete the WebSocket handshake.
    ///
    /// # Errors
    ///
    /// * `TransportError::Connect` if the connection or handshake fails
    async fn connect(&self, url: &str) -> Result<Box<dyn RoomSocket>, TransportError>;
}
