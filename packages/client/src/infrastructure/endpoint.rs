//! Socket URL construction.
//!
//! Socket URLs mirror the scheme of the page origin they are derived from:
//! `http` pages use `ws`, `https` pages use `wss`.

use thiserror::Error;
use url::{ParseError, Url};

use crate::domain::RoomSlug;

/// Path of the unread-counter socket.
pub const UNREAD_PATH: &str = "/ws/chat/unread-messages/";

/// Errors building socket URLs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Server URL is not a valid URL (got: {url}): {reason}")]
    Invalid { url: String, reason: String },

    #[error("Server URL must start with http://, https://, ws:// or wss:// (got: {0})")]
    UnsupportedScheme(String),

    #[error("Server URL has no host (got: {0})")]
    MissingHost(String),

    #[error("Server URL must not contain credentials, a query or a fragment (got: {0})")]
    NotAnOrigin(String),
}

/// Base of every socket URL (`ws://host[:port]` or `wss://host[:port]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEndpoint {
    origin: String,
}

impl ChatEndpoint {
    /// Derive socket URLs from a page origin such as `https://chat.example.com`.
    ///
    /// Any path after the host is ignored.
    pub fn from_page_origin(url: &str) -> Result<Self, EndpointError> {
        let parsed = Url::parse(url).map_err(|e| match e {
            ParseError::EmptyHost => EndpointError::MissingHost(url.to_string()),
            ParseError::RelativeUrlWithoutBase => {
                EndpointError::UnsupportedScheme(url.to_string())
            }
            other => EndpointError::Invalid {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

        let ws_scheme = match parsed.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            _ => return Err(EndpointError::UnsupportedScheme(url.to_string())),
        };
        if !parsed.username().is_empty()
            || parsed.password().is_some()
            || parsed.query().is_some()
            || parsed.fragment().is_some()
        {
            return Err(EndpointError::NotAnOrigin(url.to_string()));
        }
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| EndpointError::MissingHost(url.to_string()))?;
        let port = parsed
            .port()
            .map_or_else(String::new, |port| format!(":{port}"));

        Ok(Self {
            origin: format!("{ws_scheme}://{host}{port}"),
        })
    }

    /// `…/ws/chat/{slug}/`
    pub fn room_url(&self, slug: &RoomSlug) -> String {
        format!("{}/ws/chat/{}/", self.origin, slug)
    }

    /// `…/ws/chat/unread-messages/`
    pub fn unread_url(&self) -> String {
        format!("{}{}", self.origin, UNREAD_PATH)
    }

    pub fn is_secure(&self) -> bool {
        self.origin.starts_with("wss://")
    }
}
