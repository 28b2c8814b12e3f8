//! UseCase: ルーム接続の管理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectionManager::open_room() / close_room() / send() / next_event()
//!
//! ### なぜこのテストが必要か
//! - 同時に開いているルーム接続は常に高々 1 つであることを保証
//! - 新しいルームを開く前に、必ず古い接続が閉じられることを確認
//! - 接続されていない状態での送信がエラーとして検出されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームを開く、切り替える、閉じる
//! - 異常系：接続失敗、切断後の送信
//! - エッジケース：サーバー側からの切断後にイベント待ちが空回りしない

use std::sync::Arc;

use crate::{
    domain::{RoomConnector, RoomId, RoomProperties, RoomSlug, RoomSocket, SocketEvent},
    infrastructure::{ChatEndpoint, dto::websocket::OutboundFrame},
};

use super::error::{OpenRoomError, SendCommandError};

/// 現在開いているルーム接続
pub struct RoomConnection {
    socket: Box<dyn RoomSocket>,
    slug: RoomSlug,
    url: String,
    room_id: Option<RoomId>,
    room_name: Option<String>,
    member_count: Option<u64>,
    /// ソケットからのイベントが尽きたかどうか
    drained: bool,
}

impl RoomConnection {
    fn new(socket: Box<dyn RoomSocket>, slug: RoomSlug, url: String) -> Self {
        Self {
            socket,
            slug,
            url,
            room_id: None,
            room_name: None,
            member_count: None,
            drained: false,
        }
    }

    pub fn slug(&self) -> &RoomSlug {
        &self.slug
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `room_properties` を受信するまでは `None`
    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    pub fn room_name(&self) -> Option<&str> {
        self.room_name.as_deref()
    }

    pub fn member_count(&self) -> Option<u64> {
        self.member_count
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_open()
    }

    /// サーバーから通知されたルーム情報を反映
    pub fn apply_properties(&mut self, properties: &RoomProperties) {
        self.room_id = Some(properties.id);
        self.room_name = Some(properties.name.clone());
        self.member_count = Some(properties.user_count);
    }
}

/// ルーム接続マネージャ
///
/// アクティブなルーム接続を高々 1 つだけ保持する。接続の開閉は必ずこの
/// 型を経由する。
pub struct ConnectionManager {
    connector: Arc<dyn RoomConnector>,
    endpoint: ChatEndpoint,
    active: Option<RoomConnection>,
}

impl ConnectionManager {
    /// 新しい ConnectionManager を作成
    pub fn new(connector: Arc<dyn RoomConnector>, endpoint: ChatEndpoint) -> Self {
        Self {
            connector,
            endpoint,
            active: None,
        }
    }

    pub fn endpoint(&self) -> &ChatEndpoint {
        &self.endpoint
    }

    /// ルームを開く
    ///
    /// 既存の接続は新しい接続を確立する前に必ず閉じる。接続に失敗した場合は
    /// 再試行せず、アクティブな接続がない状態になる。
    ///
    /// # Arguments
    ///
    /// * `slug` - 開くルームのスラッグ
    ///
    /// # Returns
    ///
    /// * `Ok(&mut RoomConnection)` - 新しい接続
    /// * `Err(OpenRoomError)` - 接続失敗
    pub async fn open_room(&mut self, slug: RoomSlug) -> Result<&mut RoomConnection, OpenRoomError> {
        // 1. 既存の接続を閉じる
        self.close_room().await;

        // 2. 新しい接続を確立
        let url = self.endpoint.room_url(&slug);
        tracing::debug!("Opening room '{}' at {}", slug, url);
        let socket = self.connector.connect(&url).await?;

        Ok(self.active.insert(RoomConnection::new(socket, slug, url)))
    }

    /// アクティブな接続を閉じる
    ///
    /// # Returns
    ///
    /// 閉じた接続があった場合は `true`
    pub async fn close_room(&mut self) -> bool {
        match self.active.take() {
            Some(mut connection) => {
                connection.socket.close().await;
                tracing::info!("Chat socket closed ({})", connection.slug);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&RoomConnection> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut RoomConnection> {
        self.active.as_mut()
    }

    /// 現在開いているルームの ID（ルーム情報を受信済みの場合のみ）
    pub fn open_room_id(&self) -> Option<RoomId> {
        self.active.as_ref().and_then(RoomConnection::room_id)
    }

    /// 送信可能な接続があるか
    pub fn is_ready(&self) -> bool {
        self.active.as_ref().is_some_and(RoomConnection::is_open)
    }

    /// アクティブな接続にフレームを送信
    ///
    /// 送信前に接続の状態を確認し、開いていなければ `NotConnected` を返す。
    pub fn send(&mut self, frame: &OutboundFrame) -> Result<(), SendCommandError> {
        let connection = self
            .active
            .as_mut()
            .filter(|connection| connection.is_open())
            .ok_or(SendCommandError::NotConnected)?;
        let text = frame
            .to_json()
            .map_err(|e| SendCommandError::Encode(e.to_string()))?;
        tracing::debug!("Sending frame to '{}': {}", connection.slug, text);
        connection.socket.send_text(text)?;
        Ok(())
    }

    /// アクティブな接続の次のイベントを待つ
    ///
    /// 接続がない場合、または接続のイベントが尽きた場合は永久に待機する。
    /// 切断は `SocketEvent::Closed` として 1 回だけ通知される。
    /// `tokio::select!` の中で使用できる（キャンセル安全）。
    pub async fn next_event(&mut self) -> SocketEvent {
        let Some(connection) = self.active.as_mut().filter(|c| !c.drained) else {
            return std::future::pending().await;
        };
        match connection.socket.next_event().await {
            Some(SocketEvent::Frame(text)) => SocketEvent::Frame(text),
            Some(SocketEvent::Closed) | None => {
                connection.drained = true;
                SocketEvent::Closed
            }
        }
    }
}
