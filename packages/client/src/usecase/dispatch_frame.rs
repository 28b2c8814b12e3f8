//! UseCase: 受信フレームの振り分け
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MessageDispatcher::dispatch() メソッド
//! - type ごとのハンドラへの振り分けと、View への反映
//!
//! ### なぜこのテストが必要か
//! - ルーム一覧へのエントリ追加が ID ごとに 1 回だけであることを保証
//! - メッセージが自分・他人・システムに正しく分類されることを確認
//! - 入力中表示が連続した通知で途切れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：各 type のフレーム
//! - エッジケース：自分の入力中通知、同じルーム情報の繰り返し、フェード期限

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::{
    ChatLine, ChatView, RoomEvent, RoomId, RoomList, RoomProperties, RoomSlug, TypingIndicator,
    Username,
};

/// フレーム処理後にセッションが行うべきこと
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// View の更新のみで完了
    Rendered,
    /// ルーム情報を受信した（接続に反映する）
    RoomProperties(RoomProperties),
    /// 別のルームに切り替える
    SwitchRoom(RoomSlug),
    /// 自分の入力中通知など、何もしない
    Ignored,
}

/// 受信フレームのディスパッチャ
///
/// ルーム一覧と入力中表示の状態を保持し、フレームを到着順に 1 つずつ処理する。
pub struct MessageDispatcher {
    local_user: Username,
    room_list: RoomList,
    typing: TypingIndicator,
}

impl MessageDispatcher {
    /// 新しい MessageDispatcher を作成
    pub fn new(local_user: Username, typing_fade: Duration) -> Self {
        Self {
            local_user,
            room_list: RoomList::new(),
            typing: TypingIndicator::new(typing_fade),
        }
    }

    pub fn local_user(&self) -> &Username {
        &self.local_user
    }

    pub fn room_list(&self) -> &RoomList {
        &self.room_list
    }

    /// 入力中表示を消すべき時刻
    pub fn typing_deadline(&self) -> Option<Instant> {
        self.typing.deadline()
    }

    /// フレームを処理する
    ///
    /// # Arguments
    ///
    /// * `event` - デコード済みのフレーム
    /// * `now` - 受信時刻（入力中表示のフェード計算に使用）
    /// * `view` - 表示先
    pub fn dispatch(
        &mut self,
        event: RoomEvent,
        now: Instant,
        view: &dyn ChatView,
    ) -> DispatchOutcome {
        match event {
            RoomEvent::Properties(properties) => self.handle_room_properties(properties, view),
            RoomEvent::Typing { username, text } => {
                self.handle_user_typing(&username, &text, now, view)
            }
            RoomEvent::Members { members, form } => {
                view.replace_members(&members, &form);
                DispatchOutcome::Rendered
            }
            RoomEvent::NewRoom(slug) => {
                tracing::info!("Conversation moved to room '{}'", slug);
                DispatchOutcome::SwitchRoom(slug)
            }
            RoomEvent::Message {
                sender,
                text,
                timestamp,
                tag,
            } => {
                let line = ChatLine::new(&self.local_user, sender, text, timestamp, tag.as_deref());
                view.append_message(&line);
                DispatchOutcome::Rendered
            }
        }
    }

    fn handle_room_properties(
        &mut self,
        properties: RoomProperties,
        view: &dyn ChatView,
    ) -> DispatchOutcome {
        view.set_room_title(&properties.name);
        view.set_member_count(&properties.member_count_label());
        view.set_leave_visible(properties.leave_visible());

        let entry = properties.to_entry();
        if self.room_list.insert_if_absent(entry.clone()) {
            view.insert_room_entry(&entry);
        }
        DispatchOutcome::RoomProperties(properties)
    }

    fn handle_user_typing(
        &mut self,
        username: &str,
        text: &str,
        now: Instant,
        view: &dyn ChatView,
    ) -> DispatchOutcome {
        if self.local_user.is(username) {
            return DispatchOutcome::Ignored;
        }
        let transition = self.typing.show(now);
        tracing::trace!("Typing indicator {:?} by '{}'", transition, username);
        view.show_typing(text);
        DispatchOutcome::Rendered
    }

    /// フェード期限を過ぎていれば入力中表示を消す
    pub fn fade_typing(&mut self, now: Instant, view: &dyn ChatView) {
        if self.typing.expire(now) {
            view.hide_typing();
        }
    }

    /// ルームを閉じた・切り替えたときに入力中表示をリセットする
    pub fn reset_room(&mut self, view: &dyn ChatView) {
        if self.typing.deadline().is_some() {
            self.typing.reset();
            view.hide_typing();
        }
    }

    /// 退出したルームをルーム一覧から削除する
    pub fn forget_room(&mut self, room_id: RoomId, view: &dyn ChatView) {
        self.room_list.remove(room_id);
        view.remove_room_entry(room_id);
    }
}
