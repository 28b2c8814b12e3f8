//! Room socket on top of tokio-tungstenite.
//!
//! The stream is split into a reader task, which forwards text frames as
//! [`SocketEvent`]s, and a writer task fed by an unbounded channel. The
//! socket handle only touches the channels, so sending never blocks the
//! session loop.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    task::JoinHandle,
};
use tokio_tungstenite::{WebSocketStream, connect_async, tungstenite::Message};

use crate::domain::{RoomConnector, RoomSocket, SocketEvent, TransportError};

/// Connects room sockets with `tokio_tungstenite::connect_async`
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl RoomConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn RoomSocket>, TransportError> {
        let (stream, _response) =
            connect_async(url)
                .await
                .map_err(|e| TransportError::Connect {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        tracing::info!("Chat socket opened at {}", url);
        Ok(Box::new(WsRoomSocket::spawn(stream)))
    }
}

/// A connected room socket
pub struct WsRoomSocket {
    outbound: Option<mpsc::UnboundedSender<Message>>,
    inbound: mpsc::UnboundedReceiver<SocketEvent>,
    open: Arc<AtomicBool>,
    reader: JoinHandle<()>,
}

impl WsRoomSocket {
    /// Start the reader and writer tasks for an established stream.
    pub fn spawn<S>(stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));

        // Writer ends after a close frame or when the handle drops its sender
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let is_close = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    tracing::warn!("Failed to write to chat socket: {}", e);
                    break;
                }
                if is_close {
                    break;
                }
            }
        });

        let reader_open = open.clone();
        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        tracing::debug!("Received frame: {}", text);
                        if inbound_tx.send(SocketEvent::Frame(text.to_string())).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        tracing::debug!("Received close frame: {:?}", frame);
                        break;
                    }
                    Ok(Message::Ping(_)) => {
                        tracing::trace!("Received ping");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("Chat socket error: {}", e);
                        break;
                    }
                }
            }
            reader_open.store(false, Ordering::SeqCst);
            let _ = inbound_tx.send(SocketEvent::Closed);
        });

        Self {
            outbound: Some(outbound_tx),
            inbound: inbound_rx,
            open,
            reader,
        }
    }
}

#[async_trait]
impl RoomSocket for WsRoomSocket {
    fn is_open(&self) -> bool {
        self.outbound.is_some() && self.open.load(Ordering::SeqCst)
    }

    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        let outbound = self.outbound.as_ref().ok_or(TransportError::NotOpen)?;
        outbound
            .send(Message::Text(text.into()))
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn next_event(&mut self) -> Option<SocketEvent> {
        self.inbound.recv().await
    }

    async fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);
        if let Some(outbound) = self.outbound.take() {
            // The writer stops after the close frame; the reader is no longer needed
            let _ = outbound.send(Message::Close(None));
            self.reader.abort();
            tracing::debug!("Chat socket closed by client");
        }
    }
}

impl Drop for WsRoomSocket {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
