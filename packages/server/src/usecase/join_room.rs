//! UseCase: ルームへの参加
//!
//! ## 責務
//!
//! - 既存のチャットルーム所属を掃引してから新しいルームに参加させる
//!   （「チャットルームは同時に 1 つまで」の不変条件はここで維持）
//! - アイデンティティレコードを TTL 付きでストアに書き込む
//! - 直近の履歴をロードして返す（古い順、最大 50 件）
//!
//! ## 依存
//!
//! - `RoomRegistry`: ソケットグループの操作
//! - `SharedStore`: アイデンティティ・履歴
//! - `MessagePusher`: 参加完了の応答と既存メンバーへの通知

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::keys::{CHAT_ROOM_PREFIX, HISTORY_LOAD_LIMIT, IDENTITY_TTL_SECS, room_key, user_key};
use crate::domain::{
    ActivityAction, ChatMessage, ClientId, IdentityRecord, MessagePusher, Nickname, RoomRegistry,
    SharedStore, Symbol,
};
use crate::usecase::activity_log::ActivityLogger;
use crate::usecase::error::JoinRoomError;

/// ルームへの参加 UseCase
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    store: Arc<dyn SharedStore>,
    pusher: Arc<dyn MessagePusher>,
    activity: Arc<ActivityLogger>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルームに参加し、直近の履歴を古い順で返す
    ///
    /// 再 join はアイデンティティの上書き（ニックネーム変更・TTL 更新）に
    /// なります。履歴内の壊れたエントリは warn ログを残してスキップします。
    pub async fn execute(
        &self,
        client_id: &ClientId,
        symbol: &Symbol,
        nickname: Nickname,
    ) -> Result<Vec<ChatMessage>, JoinRoomError> {
        // 既存のチャットルーム所属を掃引（チャット以外のグループは対象外）
        for room in self.registry.rooms_of(client_id).await {
            if room.starts_with(CHAT_ROOM_PREFIX) {
                self.registry.leave(client_id, &room).await;
            }
        }
        let room = room_key(symbol);
        self.registry.join(client_id, &room).await;

        let identity = IdentityRecord {
            nickname,
            symbol: symbol.clone(),
        };
        let payload = serde_json::to_string(&identity)
            .map_err(|e| crate::domain::StoreError::Serialization(e.to_string()))?;
        self.store
            .set(&user_key(client_id), &payload, Some(IDENTITY_TTL_SECS))
            .await?;

        // 履歴は新しい順で保存されているので、読み出し後に反転する
        let raw = self
            .store
            .lrange(&room, 0, HISTORY_LOAD_LIMIT as isize - 1)
            .await?;
        let mut history: Vec<ChatMessage> = Vec::with_capacity(raw.len());
        for entry in raw {
            match serde_json::from_str::<ChatMessage>(&entry) {
                Ok(message) => history.push(message),
                Err(e) => {
                    tracing::warn!("Skipping malformed history entry in '{}': {}", room, e);
                }
            }
        }
        history.reverse();

        let event = self.activity.event(
            client_id.clone(),
            ActivityAction::JoinRoom,
            Some(symbol.clone()),
            None,
            None,
        );
        self.activity.record_detached(event);

        tracing::info!(
            "Client '{}' joined room '{}' ({} history messages)",
            client_id,
            room,
            history.len()
        );
        Ok(history)
    }

    /// 参加完了の応答を参加者本人に送信
    pub async fn reply(&self, client_id: &ClientId, content: &str) {
        if let Err(e) = self.pusher.push_to(client_id, content).await {
            tracing::warn!("Failed to reply to client '{}': {}", client_id, e);
        }
    }

    /// 参加通知をルームの既存メンバー（本人以外）に送信
    pub async fn notify_peers(&self, client_id: &ClientId, symbol: &Symbol, content: &str) {
        let peers: Vec<ClientId> = self
            .registry
            .members_of(&room_key(symbol))
            .await
            .into_iter()
            .filter(|member| member != client_id)
            .collect();
        if peers.is_empty() {
            return;
        }
        if let Err(e) = self.pusher.broadcast(peers, content).await {
            tracing::warn!("Failed to notify peers in room '{}': {}", room_key(symbol), e);
        }
    }

    /// 現在時刻（UTC ミリ秒）
    pub fn now_millis(&self) -> i64 {
        self.clock.now_utc_millis()
    }
}
