//! UseCase: クライアント接続
//!
//! ## 責務
//!
//! - 新しい接続の sender チャンネルを MessagePusher に登録
//! - connect アクティビティの記録（接続元 IP / User-Agent 付き）

use std::sync::Arc;

use crate::domain::{ActivityAction, ClientId, MessagePusher, PusherChannel};
use crate::usecase::activity_log::ActivityLogger;

/// クライアント接続 UseCase
pub struct ConnectClientUseCase {
    pusher: Arc<dyn MessagePusher>,
    activity: Arc<ActivityLogger>,
}

impl ConnectClientUseCase {
    pub fn new(pusher: Arc<dyn MessagePusher>, activity: Arc<ActivityLogger>) -> Self {
        Self { pusher, activity }
    }

    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
        ip: Option<String>,
        user_agent: Option<String>,
    ) {
        self.pusher.register_client(client_id.clone(), sender).await;

        let event = self
            .activity
            .event(client_id.clone(), ActivityAction::Connect, None, ip, user_agent);
        self.activity.record_detached(event);

        tracing::info!("Client '{}' connected", client_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SharedStore;
    use crate::infrastructure::pusher::WebSocketMessagePusher;
    use crate::infrastructure::store::InMemoryStore;
    use hiroba_shared::time::{Clock, FixedClock};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_pusher_channel() {
        // テスト項目: 接続したクライアントにメッセージを送信できるようになる
        // given (前提条件):
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(1704187800000));
        let store = Arc::new(InMemoryStore::new(Arc::clone(&clock)));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let activity = Arc::new(ActivityLogger::new(
            store as Arc<dyn SharedStore>,
            false,
            clock,
        ));
        let usecase = ConnectClientUseCase::new(pusher.clone(), activity);
        let alice = ClientId::new("alice".to_string()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(alice.clone(), tx, None, None).await;

        // then (期待する結果):
        pusher.push_to(&alice, "welcome").await.unwrap();
        assert_eq!(rx.recv().await, Some("welcome".to_string()));
    }
}
