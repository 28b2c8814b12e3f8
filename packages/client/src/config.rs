//! Command line configuration.

use std::time::Duration;

use clap::Parser;

use crate::domain::{RoomSlug, Username, ValueObjectError};

/// Terminal client for Whisper chat rooms
#[derive(Parser, Debug, Clone)]
#[command(name = "whisper-client")]
#[command(about = "Terminal client for Whisper chat rooms over WebSocket")]
#[command(version)]
pub struct Args {
    /// Origin of the chat server (http, https, ws or wss)
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    pub server_url: String,

    /// Your username, used to recognise your own messages
    #[arg(short, long)]
    pub username: String,

    /// Room slug to open on start
    #[arg(short, long)]
    pub room: Option<String>,

    /// Delay between reconnect attempts of the unread counter socket
    #[arg(long, default_value_t = 3000)]
    pub reconnect_interval_ms: u64,

    /// How long a typing notice stays visible after the last ping
    #[arg(long, default_value_t = 3000)]
    pub typing_fade_ms: u64,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub username: Username,
    pub room: Option<RoomSlug>,
    pub reconnect_interval: Duration,
    pub typing_fade: Duration,
}

impl TryFrom<Args> for ClientConfig {
    type Error = ValueObjectError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(Self {
            server_url: args.server_url,
            username: Username::new(args.username)?,
            room: args.room.map(RoomSlug::new).transpose()?,
            reconnect_interval: Duration::from_millis(args.reconnect_interval_ms),
            typing_fade: Duration::from_millis(args.typing_fade_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 省略した引数にはデフォルト値が使われる
        // given (前提条件):
        let args = Args::try_parse_from(["whisper-client", "--username", "alice"]).unwrap();

        // when (操作):
        let config = ClientConfig::try_from(args.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(args.log_level, "info");
        assert_eq!(config.server_url, "http://127.0.0.1:8000");
        assert_eq!(config.username.as_str(), "alice");
        assert_eq!(config.room, None);
        assert_eq!(config.reconnect_interval, Duration::from_millis(3000));
        assert_eq!(config.typing_fade, Duration::from_millis(3000));
    }

    #[test]
    fn test_all_flags() {
        // テスト項目: すべての引数が設定に反映される
        // given (前提条件):
        let args = Args::try_parse_from([
            "whisper-client",
            "--server-url",
            "https://chat.example.com",
            "-u",
            "bob",
            "--room",
            "general",
            "--reconnect-interval-ms",
            "500",
            "--typing-fade-ms",
            "1500",
        ])
        .unwrap();

        // when (操作):
        let config = ClientConfig::try_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.server_url, "https://chat.example.com");
        assert_eq!(config.room.unwrap().as_str(), "general");
        assert_eq!(config.reconnect_interval, Duration::from_millis(500));
        assert_eq!(config.typing_fade, Duration::from_millis(1500));
    }

    #[test]
    fn test_username_is_required() {
        // テスト項目: ユーザー名は必須
        // when (操作):
        let result = Args::try_parse_from(["whisper-client"]);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_room_slug() {
        // テスト項目: 不正なルームスラッグは設定エラーになる
        // given (前提条件):
        let args =
            Args::try_parse_from(["whisper-client", "-u", "alice", "--room", "a/b"]).unwrap();

        // when (操作):
        let result = ClientConfig::try_from(args);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ValueObjectError::RoomSlugInvalidFormat(_))
        ));
    }
}
