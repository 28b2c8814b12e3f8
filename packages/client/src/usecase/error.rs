//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{TransportError, ValueObjectError};

/// ルームを開く際のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpenRoomError {
    /// 接続またはハンドシェイクに失敗
    #[error("Failed to open room: {0}")]
    Transport(#[from] TransportError),
}

/// コマンド送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendCommandError {
    /// ルームが開かれていない、または接続が閉じている
    #[error("Not connected to a chat room. Open a room or reconnect and try again.")]
    NotConnected,

    /// 入力がドメインの制約を満たさない（長すぎるメッセージなど）
    #[error("Message not sent: {0}")]
    InvalidMessage(ValueObjectError),

    /// フレームのシリアライズに失敗
    #[error("Failed to encode frame: {0}")]
    Encode(String),

    /// ソケットへの書き込みに失敗
    #[error(transparent)]
    Transport(TransportError),
}

impl From<TransportError> for SendCommandError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::NotOpen => Self::NotConnected,
            other => Self::Transport(other),
        }
    }
}
