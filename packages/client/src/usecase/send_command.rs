//! UseCase: ユーザー操作の送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendCommandUseCase::build() / execute() メソッド
//! - ユーザー操作から送信フレームへの変換と、送信前の接続確認
//!
//! ### なぜこのテストが必要か
//! - 空のメッセージや空の選択ではフレームを送信しないことを保証
//! - 接続が閉じている場合に黙って捨てず、エラーを返すことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：各コマンドの送信
//! - 異常系：未接続・切断後の送信
//! - エッジケース：空白のみのメッセージ、空のメンバー選択

use crate::{
    domain::{MessageText, UserId, ValueObjectError},
    infrastructure::dto::websocket::{CommandFrame, OutboundFrame},
};

use super::{connection_manager::ConnectionManager, error::SendCommandError};

/// ユーザーが行える送信操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// チャットメッセージ（入力されたままの文字列）
    SendMessage(String),
    /// 入力中の通知
    Typing,
    /// ルームから退出
    LeaveRoom,
    /// メンバーを削除
    RemoveMember(UserId),
    /// 選択したメンバーを追加
    AddMembers(Vec<UserId>),
    /// メンバー一覧を要求
    RequestMembers,
}

/// 送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// フレームを送信した
    Sent,
    /// 送信するものがなかった（空のメッセージ・空の選択）
    Skipped,
}

/// ユーザー操作送信のユースケース
pub struct SendCommandUseCase<'a> {
    /// アクティブなルーム接続
    manager: &'a mut ConnectionManager,
}

impl<'a> SendCommandUseCase<'a> {
    /// 新しい SendCommandUseCase を作成
    pub fn new(manager: &'a mut ConnectionManager) -> Self {
        Self { manager }
    }

    /// ユーザー操作を送信フレームに変換する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(OutboundFrame))` - 送信するフレーム
    /// * `Ok(None)` - 送信しない（空白のみのメッセージ、空のメンバー選択）
    /// * `Err(SendCommandError::InvalidMessage)` - 長すぎるメッセージ
    pub fn build(intent: &UserIntent) -> Result<Option<OutboundFrame>, SendCommandError> {
        let frame = match intent {
            UserIntent::SendMessage(raw) => match MessageText::new(raw) {
                Ok(text) => OutboundFrame::Message {
                    message: text.into_string(),
                },
                Err(ValueObjectError::MessageTextEmpty) => return Ok(None),
                Err(e) => return Err(SendCommandError::InvalidMessage(e)),
            },
            UserIntent::Typing => OutboundFrame::Command(CommandFrame::UserTyping),
            UserIntent::LeaveRoom => OutboundFrame::Command(CommandFrame::LeaveRoom),
            UserIntent::RemoveMember(user_id) => {
                OutboundFrame::Command(CommandFrame::RemoveMember { user_id: *user_id })
            }
            UserIntent::AddMembers(user_ids) if user_ids.is_empty() => return Ok(None),
            UserIntent::AddMembers(user_ids) => OutboundFrame::Command(CommandFrame::AddMembers {
                user_ids: user_ids.clone(),
            }),
            UserIntent::RequestMembers => OutboundFrame::Command(CommandFrame::RoomMembers),
        };
        Ok(Some(frame))
    }

    /// ユーザー操作を送信する
    ///
    /// # Arguments
    ///
    /// * `intent` - 送信する操作
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - 送信した、または送信するものがなかった
    /// * `Err(SendCommandError::NotConnected)` - 接続が開いていない
    /// * `Err(SendCommandError::InvalidMessage)` - メッセージが制約を満たさない
    /// * `Err(SendCommandError)` - その他の送信失敗
    pub fn execute(&mut self, intent: &UserIntent) -> Result<SendOutcome, SendCommandError> {
        // 1. フレームを構築（送信するものがなければ何もしない）
        let Some(frame) = Self::build(intent)? else {
            tracing::debug!("Nothing to send for {:?}", intent);
            return Ok(SendOutcome::Skipped);
        };

        // 2. 接続を確認して送信
        self.manager.send(&frame)?;
        Ok(SendOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomSlug, value_object::MESSAGE_TEXT_MAX_LEN},
        infrastructure::ChatEndpoint,
        test_support::{FakeConnector, FakeRemote},
    };

    async fn create_connected_manager() -> (ConnectionManager, FakeRemote) {
        let connector = FakeConnector::new();
        let endpoint = ChatEndpoint::from_page_origin("http://chat.test").unwrap();
        let mut manager = ConnectionManager::new(connector.clone(), endpoint);
        manager
            .open_room(RoomSlug::new("general".to_string()).unwrap())
            .await
            .unwrap();
        (manager, connector.remote(0))
    }

    #[test]
    fn test_build_trims_message() {
        // テスト項目: メッセージは前後の空白を除去して送信される
        // when (操作):
        let frame = SendCommandUseCase::build(&UserIntent::SendMessage("  hi  ".to_string()));

        // then (期待する結果):
        assert_eq!(
            frame,
            Ok(Some(OutboundFrame::Message {
                message: "hi".to_string()
            }))
        );
    }

    #[test]
    fn test_build_skips_blank_message() {
        // テスト項目: 空・空白のみのメッセージはフレームにならない
        // then (期待する結果):
        assert_eq!(
            SendCommandUseCase::build(&UserIntent::SendMessage(String::new())),
            Ok(None)
        );
        assert_eq!(
            SendCommandUseCase::build(&UserIntent::SendMessage(" \t ".to_string())),
            Ok(None)
        );
    }

    #[test]
    fn test_build_add_members() {
        // テスト項目: 空の選択はフレームにならず、選択があれば全 ID を含む 1 フレームになる
        // then (期待する結果):
        assert_eq!(
            SendCommandUseCase::build(&UserIntent::AddMembers(vec![])),
            Ok(None)
        );
        assert_eq!(
            SendCommandUseCase::build(&UserIntent::AddMembers(vec![
                UserId::new(3),
                UserId::new(8)
            ])),
            Ok(Some(OutboundFrame::Command(CommandFrame::AddMembers {
                user_ids: vec![UserId::new(3), UserId::new(8)]
            })))
        );
    }

    #[tokio::test]
    async fn test_execute_sends_each_command() {
        // テスト項目: 各操作が対応するフレームとして送信される
        // given (前提条件):
        let (mut manager, remote) = create_connected_manager().await;
        let mut usecase = SendCommandUseCase::new(&mut manager);

        // when (操作):
        for intent in [
            UserIntent::SendMessage("hello".to_string()),
            UserIntent::Typing,
            UserIntent::RequestMembers,
            UserIntent::RemoveMember(UserId::new(4)),
            UserIntent::AddMembers(vec![UserId::new(1), UserId::new(2)]),
            UserIntent::LeaveRoom,
        ] {
            assert_eq!(usecase.execute(&intent), Ok(SendOutcome::Sent));
        }

        // then (期待する結果):
        assert_eq!(
            remote.sent(),
            vec![
                r#"{"message":"hello"}"#,
                r#"{"type":"user_typing"}"#,
                r#"{"type":"room_members"}"#,
                r#"{"type":"remove_member","user_id":4}"#,
                r#"{"type":"add_members","user_ids":[1,2]}"#,
                r#"{"type":"leave_room"}"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_blank_message_sends_nothing() {
        // テスト項目: 空白のみのメッセージは送信されない
        // given (前提条件):
        let (mut manager, remote) = create_connected_manager().await;

        // when (操作):
        let result =
            SendCommandUseCase::new(&mut manager).execute(&UserIntent::SendMessage("   ".into()));

        // then (期待する結果):
        assert_eq!(result, Ok(SendOutcome::Skipped));
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn test_execute_empty_selection_sends_nothing() {
        // テスト項目: 空のメンバー選択は送信されない
        // given (前提条件):
        let (mut manager, remote) = create_connected_manager().await;

        // when (操作):
        let result = SendCommandUseCase::new(&mut manager).execute(&UserIntent::AddMembers(vec![]));

        // then (期待する結果):
        assert_eq!(result, Ok(SendOutcome::Skipped));
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn test_execute_too_long_message_fails() {
        // テスト項目: 上限を超えるメッセージは黙って捨てず、エラーになる
        // given (前提条件):
        let (mut manager, remote) = create_connected_manager().await;
        let text = "a".repeat(MESSAGE_TEXT_MAX_LEN + 1);

        // when (操作):
        let result = SendCommandUseCase::new(&mut manager).execute(&UserIntent::SendMessage(text));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendCommandError::InvalidMessage(
                ValueObjectError::MessageTextTooLong {
                    max: MESSAGE_TEXT_MAX_LEN,
                    actual: MESSAGE_TEXT_MAX_LEN + 1,
                }
            ))
        );
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn test_execute_after_disconnect_fails() {
        // テスト項目: 切断後の送信は NotConnected エラーになる（黙って捨てない）
        // given (前提条件):
        let (mut manager, remote) = create_connected_manager().await;
        remote.disconnect();

        // when (操作):
        let result = SendCommandUseCase::new(&mut manager).execute(&UserIntent::Typing);

        // then (期待する結果):
        assert_eq!(result, Err(SendCommandError::NotConnected));
        assert!(remote.sent().is_empty());
    }

    #[test]
    fn test_execute_without_room_fails() {
        // テスト項目: ルームを開いていない状態での送信は NotConnected エラーになる
        // given (前提条件):
        let endpoint = ChatEndpoint::from_page_origin("http://chat.test").unwrap();
        let mut manager = ConnectionManager::new(FakeConnector::new(), endpoint);

        // when (操作):
        let result =
            SendCommandUseCase::new(&mut manager).execute(&UserIntent::SendMessage("hi".into()));

        // then (期待する結果):
        assert_eq!(result, Err(SendCommandError::NotConnected));
    }
}
