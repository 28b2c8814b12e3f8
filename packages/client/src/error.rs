//! Top-level client errors.

use thiserror::Error;

use crate::{domain::ValueObjectError, infrastructure::EndpointError};

/// Errors that end the client before or during startup
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be turned into WebSocket URLs
    #[error("Invalid server URL: {0}")]
    Endpoint(#[from] EndpointError),

    /// A command line value failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValueObjectError),

    /// The prompt thread could not be started
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
