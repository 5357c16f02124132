//! UseCase: ルームからの退出
//!
//! ## 責務
//!
//! - ソケットグループからの退出
//! - アイデンティティレコードの削除
//!
//! 退出は冪等です。所属していないルームからの leave も成功します。
//! アイデンティティの削除はルームの一致を確認しません（leave イベントを
//! 送ったクライアントはどのルーム宛でも送信資格を失います）。

use std::sync::Arc;

use crate::domain::keys::{room_key, user_key};
use crate::domain::{ClientId, RoomRegistry, SharedStore, StoreError, Symbol};

/// ルームからの退出 UseCase
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    store: Arc<dyn SharedStore>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, store: Arc<dyn SharedStore>) -> Self {
        Self { registry, store }
    }

    pub async fn execute(&self, client_id: &ClientId, symbol: &Symbol) -> Result<(), StoreError> {
        self.registry.leave(client_id, &room_key(symbol)).await;
        self.store.del(&user_key(client_id)).await?;
        tracing::info!("Client '{}' left room '{}'", client_id, room_key(symbol));
        Ok(())
    }
}
