//! UseCase: クライアント切断
//!
//! ## 責務
//!
//! - 所属している全チャットルームからの退出
//! - アイデンティティレコードの削除
//! - sender チャンネルの登録解除
//!
//! 切断は最終掃除の経路であり、失敗しても呼び出し元に伝搬しません
//! （既に切れた接続に対してできることは無いため、warn ログに残すのみ）。

use std::sync::Arc;

use crate::domain::keys::{CHAT_ROOM_PREFIX, user_key};
use crate::domain::{ClientId, MessagePusher, RoomRegistry, SharedStore};

/// クライアント切断 UseCase
pub struct DisconnectClientUseCase {
    registry: Arc<dyn RoomRegistry>,
    store: Arc<dyn SharedStore>,
    pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        store: Arc<dyn SharedStore>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            store,
            pusher,
        }
    }

    pub async fn execute(&self, client_id: &ClientId) {
        for room in self.registry.rooms_of(client_id).await {
            if room.starts_with(CHAT_ROOM_PREFIX) {
                self.registry.leave(client_id, &room).await;
            }
        }
        self.registry.remove_client(client_id).await;

        if let Err(e) = self.store.del(&user_key(client_id)).await {
            tracing::warn!(
                "Failed to delete identity for disconnecting client '{}': {}",
                client_id,
                e
            );
        }

        self.pusher.unregister_client(client_id).await;
        tracing::info!("Client '{}' disconnected", client_id);
    }
}
