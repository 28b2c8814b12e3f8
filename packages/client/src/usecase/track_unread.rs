//! UseCase: 未読数の反映
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TrackUnreadUseCase::execute() メソッド
//! - 未読数の更新をバッジとルーム一覧のハイライトへ反映
//!
//! ### なぜこのテストが必要か
//! - 未読更新は常に全体の置き換えであり、差分適用ではないことを保証
//! - 未読 0 件の場合に両方のバッジがクリアされることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：未読のあるルームが複数
//! - エッジケース：未読 0 件、現在開いているルームに未読がある場合

use crate::domain::{ChatView, RoomId, UnreadState};

/// 未読数反映のユースケース
pub struct TrackUnreadUseCase<'a> {
    view: &'a dyn ChatView,
}

impl<'a> TrackUnreadUseCase<'a> {
    /// 新しい TrackUnreadUseCase を作成
    pub fn new(view: &'a dyn ChatView) -> Self {
        Self { view }
    }

    /// 未読状態を View に反映する
    ///
    /// バッジとハイライトはすべて置き換える。現在開いているルームは
    /// 読んでいる最中なのでハイライトしない。
    ///
    /// # Arguments
    ///
    /// * `state` - サーバーから受信した未読状態
    /// * `open_room` - 現在開いているルームの ID
    ///
    /// # Returns
    ///
    /// ハイライトしたルームの数
    pub fn execute(&self, state: &UnreadState, open_room: Option<RoomId>) -> usize {
        self.view.set_unread_total(state.total_badge());
        self.view.set_unread_rooms(state.rooms_badge());
        self.view.clear_room_highlights();

        let mut highlighted = 0;
        for (room_id, unread) in state.rooms() {
            if open_room == Some(room_id) {
                tracing::debug!("Skipping highlight for open room {}", room_id);
                continue;
            }
            self.view.highlight_room(room_id, unread);
            highlighted += 1;
        }
        highlighted
    }
}
