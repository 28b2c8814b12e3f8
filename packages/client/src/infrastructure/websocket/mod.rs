//! WebSocket transports.

pub mod reconnecting;
pub mod room_socket;

pub use reconnecting::{DEFAULT_RECONNECT_INTERVAL, ReconnectingSocket};
pub use room_socket::{TungsteniteConnector, WsRoomSocket};
