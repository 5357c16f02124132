//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信の抽象化。
//! WebSocket の生成は UI 層で行われ、この trait は生成済みの
//! sender チャンネルを預かって送信のみを担当します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ClientId;

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの sender チャンネルを登録
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// クライアントの sender チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージを送信
    ///
    /// ブロードキャストでは一部の送信失敗を許容します。
    async fn broadcast(&self, targets: Vec<ClientId>, content: &str)
    -> Result<(), MessagePushError>;
}
