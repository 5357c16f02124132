//! UseCase: タイピング中インジケータの中継
//!
//! ## 責務
//!
//! - タイピング通知を送信者以外のルームメンバーに中継する
//!
//! タイピング通知は一時的な状態であり、検証も保存も記録もされません。
//! アイデンティティの無いクライアントからの通知も中継されます。

use std::sync::Arc;

use crate::domain::keys::room_key;
use crate::domain::{ClientId, MessagePusher, RoomRegistry, Symbol};

/// タイピング中インジケータの中継 UseCase
pub struct TypingUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { registry, pusher }
    }

    /// 通知を送信者以外のメンバーに中継（本人にはエコーしない）
    pub async fn execute(&self, client_id: &ClientId, symbol: &Symbol, content: &str) {
        let room = room_key(symbol);
        let peers: Vec<ClientId> = self
            .registry
            .members_of(&room)
            .await
            .into_iter()
            .filter(|member| member != client_id)
            .collect();
        if peers.is_empty() {
            return;
        }
        if let Err(e) = self.pusher.broadcast(peers, content).await {
            tracing::warn!("Failed to relay typing indicator to room '{}': {}", room, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pusher::WebSocketMessagePusher;
    use crate::infrastructure::registry::InProcessRoomRegistry;
    use tokio::sync::mpsc;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_typing_is_relayed_to_peers_only() {
        // テスト項目: タイピング通知が送信者以外のメンバーだけに中継される
        // given (前提条件):
        let registry = Arc::new(InProcessRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let alice = client("alice");
        let bob = client("bob");
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        pusher.register_client(alice.clone(), tx_a).await;
        pusher.register_client(bob.clone(), tx_b).await;
        registry.join(&alice, "stock:AAPL").await;
        registry.join(&bob, "stock:AAPL").await;
        let usecase = TypingUseCase::new(registry, pusher);

        // when (操作):
        usecase
            .execute(&alice, &symbol("AAPL"), r#"{"type":"userTyping"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(rx_b.recv().await, Some(r#"{"type":"userTyping"}"#.to_string()));
        assert!(rx_a.try_recv().is_err()); // 本人にはエコーされない
    }

    #[tokio::test]
    async fn test_typing_in_empty_room_is_noop() {
        // テスト項目: メンバーのいないルームへのタイピング通知が何も起こさない
        // given (前提条件):
        let registry = Arc::new(InProcessRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = TypingUseCase::new(registry, pusher);

        // when (操作):
        usecase
            .execute(&client("alice"), &symbol("AAPL"), "{}")
            .await;

        // then (期待する結果): パニックやエラーが起こらない
    }
}
