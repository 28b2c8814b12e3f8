//! Receive-only WebSocket that reconnects on a fixed interval.
//!
//! Used for the unread counter socket. Connection failures are logged and
//! never reported to the caller; the socket simply tries again after the
//! interval. There is no backoff.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Default delay between reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);

/// A receive-only socket that keeps reconnecting
#[derive(Debug, Clone)]
pub struct ReconnectingSocket {
    url: String,
    interval: Duration,
}

impl ReconnectingSocket {
    pub fn new(url: String, interval: Duration) -> Self {
        Self { url, interval }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the connect/read/reconnect loop in a background task.
    ///
    /// Every text frame is forwarded to `frames`. The task ends when the
    /// receiving side of `frames` is dropped or the handle is aborted.
    pub fn spawn(self, frames: mpsc::Sender<String>) -> JoinHandle<()> {
        tokio::spawn(self.run(frames))
    }

    async fn run(self, frames: mpsc::Sender<String>) {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            match connect_async(self.url.as_str()).await {
                Ok((mut stream, _)) => {
                    tracing::info!("Unread chat messages socket opened at {}", self.url);
                    attempt = 0;
                    while let Some(message) = stream.next().await {
                        match message {
                            Ok(Message::Text(text)) => {
                                if frames.send(text.to_string()).await.is_err() {
                                    tracing::debug!("Unread receiver dropped, stopping");
                                    return;
                                }
                            }
                            Ok(Message::Close(_)) => break,
                            Ok(_) => {}
                            Err(e) => {
                                tracing::warn!("Unread chat messages socket error: {}", e);
                                break;
                            }
                        }
                    }
                    tracing::error!("Unread chat messages socket closed");
                }
                Err(e) => {
                    tracing::warn!(
                        "Unread chat messages socket failed to connect (attempt {}): {}",
                        attempt,
                        e
                    );
                }
            }

            if frames.is_closed() {
                return;
            }
            sleep(self.interval).await;
        }
    }
}
