//! Infrastructure layer: wire format and WebSocket transports.

pub mod dto;
pub mod endpoint;
pub mod websocket;

pub use endpoint::{ChatEndpoint, EndpointError};
