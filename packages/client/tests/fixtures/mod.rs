//! Test fixtures: an in-process chat server speaking the room and unread
//! WebSocket protocols.

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::any,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct FixtureState {
    /// `"{slug} {frame}"` for every frame received, plus `"{slug} closed"`
    log: Mutex<Vec<String>>,
    unread_connections: AtomicU64,
}

impl FixtureState {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

/// Chat server bound to an ephemeral local port
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<FixtureState>,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = Arc::new(FixtureState::default());
        let app = Router::new()
            .route("/ws/chat/unread-messages/", any(unread_handler))
            .route("/ws/chat/{slug}/", any(room_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, state }
    }

    /// Page origin, as passed to `--server-url`
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn log(&self) -> Vec<String> {
        self.state.log.lock().unwrap().clone()
    }

    /// Wait until `entry` shows up in the log.
    pub async fn wait_for(&self, entry: &str) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !self.log().iter().any(|e| e == entry) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("'{entry}' not logged: {:?}", self.log()));
    }
}

pub fn room_properties(slug: &str) -> Value {
    json!({
        "type": "room_properties",
        "room_id": room_id(slug),
        "room_name": slug.to_uppercase(),
        "room_slug": slug,
        "room_modified": "today",
        "user_count": 2,
        "is_user_to_user": slug.starts_with("dm-"),
    })
}

pub fn room_id(slug: &str) -> u64 {
    slug.bytes().map(u64::from).sum()
}

async fn room_handler(
    ws: WebSocketUpgrade,
    Path(slug): Path<String>,
    State(state): State<Arc<FixtureState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_room(socket, slug, state))
}

async fn handle_room(mut socket: WebSocket, slug: String, state: Arc<FixtureState>) {
    let greeting = [
        room_properties(&slug),
        json!({
            "type": "websocket.connect",
            "message": format!("Welcome to {slug}"),
            "username": null,
            "timestamp": "09:00",
        }),
    ];
    for frame in greeting {
        if socket
            .send(Message::Text(frame.to_string().into()))
            .await
            .is_err()
        {
            return;
        }
    }

    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            if matches!(message, Message::Close(_)) {
                break;
            }
            continue;
        };
        state.record(format!("{slug} {}", text.as_str()));

        let frame: Value = serde_json::from_str(text.as_str()).unwrap_or(Value::Null);
        let reply = match frame.get("type").and_then(Value::as_str) {
            None => Some(json!({
                "type": "chat_message",
                "message": frame["message"],
                "username": "alice",
                "timestamp": "10:00",
            })),
            Some("room_members") => Some(json!({
                "type": "room_members",
                "members": [
                    {"id": 1, "name": "alice", "html": "<li>alice</li>"},
                    {"id": 2, "name": "bob", "html": "<li>bob</li>"},
                ],
                "form": "<form></form>",
            })),
            Some("add_members") if slug.starts_with("dm-") => Some(json!({
                "type": "new_room",
                "slug": "group-1",
            })),
            Some("leave_room") => break,
            _ => None,
        };
        if let Some(reply) = reply {
            if socket
                .send(Message::Text(reply.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    }

    state.record(format!("{slug} closed"));
}

async fn unread_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<FixtureState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_unread(socket, state))
}

/// Send one update whose count is the connection number, then hang up.
async fn handle_unread(mut socket: WebSocket, state: Arc<FixtureState>) {
    let n = state.unread_connections.fetch_add(1, Ordering::SeqCst) + 1;
    let update = json!({
        "unread_messages": n,
        "unread_rooms": [{"pk": 1, "unread_messages": n}],
    });
    let _ = socket.send(Message::Text(update.to_string().into())).await;
    let _ = socket.send(Message::Close(None)).await;
}
