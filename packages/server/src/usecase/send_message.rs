//! UseCase: メッセージの送信
//!
//! ## 責務
//!
//! - アイデンティティの存在確認（送信の唯一のゲート）
//! - メッセージの組み立てと履歴への追記（上限 100 件、TTL 24 時間）
//! - ルーム全メンバー（送信者本人を含む）への配信
//!
//! ## エッジケース
//!
//! - アイデンティティが無い（未 join または TTL 失効）場合、メッセージは
//!   保存も配信もされず、送信者本人だけがエラー通知を受け取る
//! - 宛先シンボルはアイデンティティのシンボルと照合されない（リクエストの
//!   symbol がそのまま宛先ルームになる）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::keys::{ROOM_HISTORY_CAP, ROOM_TTL_SECS, room_key, user_key};
use crate::domain::{
    ActivityAction, ChatMessage, ClientId, IdentityRecord, MessageContent, MessagePusher,
    RoomRegistry, SharedStore, StoreBatch, StoreError, Symbol, Timestamp,
};
use crate::usecase::activity_log::ActivityLogger;
use crate::usecase::error::SendMessageError;

/// メッセージの送信 UseCase
pub struct SendMessageUseCase {
    registry: Arc<dyn RoomRegistry>,
    store: Arc<dyn SharedStore>,
    pusher: Arc<dyn MessagePusher>,
    activity: Arc<ActivityLogger>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        store: Arc<dyn SharedStore>,
        pusher: Arc<dyn MessagePusher>,
        activity: Arc<ActivityLogger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            store,
            pusher,
            activity,
            clock,
        }
    }

    /// メッセージを検証・保存し、組み立てたメッセージを返す
    ///
    /// 配信は `broadcast` で別途行います（UI 層がワイヤ形式を組み立てるため）。
    pub async fn execute(
        &self,
        client_id: &ClientId,
        symbol: &Symbol,
        content: MessageContent,
    ) -> Result<ChatMessage, SendMessageError> {
        let identity = self
            .store
            .get(&user_key(client_id))
            .await?
            .ok_or(SendMessageError::UserNotFound)?;
        let identity: IdentityRecord = serde_json::from_str(&identity)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let message = ChatMessage::new(
            client_id,
            identity.nickname,
            content,
            Timestamp::new(self.clock.now_utc_millis()),
            symbol.clone(),
        );
        let payload = serde_json::to_string(&message)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let room = room_key(symbol);
        let mut batch = StoreBatch::new();
        batch
            .lpush(&room, payload)
            .ltrim(&room, 0, ROOM_HISTORY_CAP as isize - 1)
            .expire(&room, ROOM_TTL_SECS);
        self.store.submit(batch).await?;

        let event = self.activity.event(
            client_id.clone(),
            ActivityAction::SendMessage,
            Some(symbol.clone()),
            None,
            None,
        );
        self.activity.record_detached(event);

        Ok(message)
    }

    /// メッセージをルームの全メンバー（送信者本人を含む）に配信
    pub async fn broadcast(&self, symbol: &Symbol, content: &str) {
        let room = room_key(symbol);
        let members = self.registry.members_of(&room).await;
        if let Err(e) = self.pusher.broadcast(members, content).await {
            tracing::warn!("Failed to broadcast message to room '{}': {}", room, e);
        }
    }

    /// エラー通知を送信者本人だけに送信
    pub async fn reply_error(&self, client_id: &ClientId, content: &str) {
        if let Err(e) = self.pusher.push_to(client_id, content).await {
            tracing::warn!("Failed to push error to client '{}': {}", client_id, e);
        }
    }
}
