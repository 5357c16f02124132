//! プロセス内ソケットグループレジストリ
//!
//! ルーム名 → クライアント集合、クライアント → ルーム集合の双方向
//! マップを 1 つのロックの下で管理します。ロックを await をまたいで
//! 保持しないため、異なる接続のハンドラは自由にインターリーブできます。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, RoomRegistry};

#[derive(Debug, Default)]
struct Groups {
    /// Key: ルーム名, Value: 所属クライアント
    members: HashMap<String, HashSet<ClientId>>,
    /// Key: クライアント, Value: 所属ルーム名
    rooms: HashMap<ClientId, HashSet<String>>,
}

/// プロセス内 RoomRegistry 実装
#[derive(Debug, Default)]
pub struct InProcessRoomRegistry {
    groups: Mutex<Groups>,
}

impl InProcessRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InProcessRoomRegistry {
    async fn join(&self, client_id: &ClientId, room: &str) {
        let mut groups = self.groups.lock().await;
        groups
            .members
            .entry(room.to_string())
            .or_default()
            .insert(client_id.clone());
        groups
            .rooms
            .entry(client_id.clone())
            .or_default()
            .insert(room.to_string());
        tracing::debug!("Client '{}' joined group '{}'", client_id, room);
    }

    async fn leave(&self, client_id: &ClientId, room: &str) {
        let mut groups = self.groups.lock().await;
        if let Some(members) = groups.members.get_mut(room) {
            members.remove(client_id);
            if members.is_empty() {
                groups.members.remove(room);
            }
        }
        if let Some(rooms) = groups.rooms.get_mut(client_id) {
            rooms.remove(room);
            if rooms.is_empty() {
                groups.rooms.remove(client_id);
            }
        }
    }

    async fn rooms_of(&self, client_id: &ClientId) -> Vec<String> {
        let groups = self.groups.lock().await;
        groups
            .rooms
            .get(client_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn members_of(&self, room: &str) -> Vec<ClientId> {
        let groups = self.groups.lock().await;
        groups
            .members
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn remove_client(&self, client_id: &ClientId) {
        let mut groups = self.groups.lock().await;
        if let Some(rooms) = groups.rooms.remove(client_id) {
            for room in rooms {
                if let Some(members) = groups.members.get_mut(&room) {
                    members.remove(client_id);
                    if members.is_empty() {
                        groups.members.remove(&room);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_and_members_of() {
        // テスト項目: join したクライアントがグループのメンバーとして取得できる
        // given (前提条件):
        let registry = InProcessRoomRegistry::new();
        let alice = client("alice");
        let bob = client("bob");

        // when (操作):
        registry.join(&alice, "stock:AAPL").await;
        registry.join(&bob, "stock:AAPL").await;

        // then (期待する結果):
        let members = registry.members_of("stock:AAPL").await;
        assert_eq!(members.len(), 2);
        assert!(members.contains(&alice));
        assert!(members.contains(&bob));
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        // テスト項目: 同じグループへの重複 join が二重登録されない
        // given (前提条件):
        let registry = InProcessRoomRegistry::new();
        let alice = client("alice");

        // when (操作):
        registry.join(&alice, "stock:AAPL").await;
        registry.join(&alice, "stock:AAPL").await;

        // then (期待する結果):
        assert_eq!(registry.members_of("stock:AAPL").await.len(), 1);
        assert_eq!(registry.rooms_of(&alice).await.len(), 1);
    }

    #[tokio::test]
    async fn test_leave_removes_membership() {
        // テスト項目: leave でグループと逆引きの両方から削除される
        // given (前提条件):
        let registry = InProcessRoomRegistry::new();
        let alice = client("alice");
        registry.join(&alice, "stock:AAPL").await;

        // when (操作):
        registry.leave(&alice, "stock:AAPL").await;

        // then (期待する結果):
        assert!(registry.members_of("stock:AAPL").await.is_empty());
        assert!(registry.rooms_of(&alice).await.is_empty());
    }

    #[tokio::test]
    async fn test_leave_unjoined_room_is_noop() {
        // テスト項目: 所属していないグループからの leave が何も起こさない（冪等性）
        // given (前提条件):
        let registry = InProcessRoomRegistry::new();
        let alice = client("alice");
        registry.join(&alice, "stock:AAPL").await;

        // when (操作):
        registry.leave(&alice, "stock:TSLA").await;

        // then (期待する結果):
        assert_eq!(registry.members_of("stock:AAPL").await.len(), 1);
        assert_eq!(registry.rooms_of(&alice).await, vec!["stock:AAPL"]);
    }

    #[tokio::test]
    async fn test_remove_client_clears_all_groups() {
        // テスト項目: remove_client が全グループからクライアントを削除する
        // given (前提条件):
        let registry = InProcessRoomRegistry::new();
        let alice = client("alice");
        registry.join(&alice, "stock:AAPL").await;
        registry.join(&alice, "stock:TSLA").await;

        // when (操作):
        registry.remove_client(&alice).await;

        // then (期待する結果):
        assert!(registry.rooms_of(&alice).await.is_empty());
        assert!(registry.members_of("stock:AAPL").await.is_empty());
        assert!(registry.members_of("stock:TSLA").await.is_empty());
    }
}
