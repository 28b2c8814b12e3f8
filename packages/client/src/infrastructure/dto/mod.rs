//! Data transfer objects for the wire protocol.

pub mod websocket;
