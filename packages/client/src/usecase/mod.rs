//! UseCase 層
//!
//! クライアントの振る舞いを実装するレイヤー。
//! UI 層から呼び出され、Domain 層のモデルとポートを操作します。

pub mod connection_manager;
pub mod dispatch_frame;
pub mod error;
pub mod send_command;
pub mod track_unread;

pub use connection_manager::{ConnectionManager, RoomConnection};
pub use dispatch_frame::{DispatchOutcome, MessageDispatcher};
pub use error::{OpenRoomError, SendCommandError};
pub use send_command::{SendCommandUseCase, SendOutcome, UserIntent};
pub use track_unread::TrackUnreadUseCase;
