//! RoomRegistry trait 定義
//!
//! プロセス内のソケットグループメンバーシップへのインターフェース。
//! ここにあるのはファンアウト用の派生キャッシュであり、アイデンティティや
//! 履歴の信頼できる情報源として扱ってはいけません（それはストアの役割）。

use async_trait::async_trait;

use super::value_object::ClientId;

/// ソケットグループレジストリ trait
///
/// レジストリ自体は任意個のグループ所属を許容します。
/// 「チャットルームは同時に 1 つまで」という不変条件は join の
/// ユースケース側が掃引によって維持します。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// クライアントをグループに追加（既に所属していれば何もしない）
    async fn join(&self, client_id: &ClientId, room: &str);

    /// クライアントをグループから削除（所属していなければ何もしない）
    async fn leave(&self, client_id: &ClientId, room: &str);

    /// クライアントが所属している全グループを取得
    async fn rooms_of(&self, client_id: &ClientId) -> Vec<String>;

    /// グループに所属している全クライアントを取得
    async fn members_of(&self, room: &str) -> Vec<ClientId>;

    /// クライアントを全グループから削除（切断時の最終掃除）
    async fn remove_client(&self, client_id: &ClientId);
}
