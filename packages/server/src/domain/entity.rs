//! エンティティ
//!
//! ワイヤ形式とストア形式は同一の JSON です（ルーム履歴には
//! ブロードキャストしたものと同じメッセージ JSON が保存されます）。
//! フィールド名はワイヤ互換のため camelCase を使用します。

use serde::{Deserialize, Serialize};

use super::value_object::{ClientId, MessageContent, Nickname, Symbol, Timestamp};

/// チャットメッセージ
///
/// 一度生成されたら不変。`id` は「接続 ID + 送信時刻」の組み立てであり、
/// クロックスキューをまたいだグローバルな一意性は保証されません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub nickname: Nickname,
    pub message: MessageContent,
    pub timestamp: Timestamp,
    pub symbol: Symbol,
}

impl ChatMessage {
    /// 新しいチャットメッセージを作成
    pub fn new(
        sender: &ClientId,
        nickname: Nickname,
        message: MessageContent,
        timestamp: Timestamp,
        symbol: Symbol,
    ) -> Self {
        Self {
            id: format!("{}-{}", sender.as_str(), timestamp.value()),
            nickname,
            message,
            timestamp,
            symbol,
        }
    }
}

/// アイデンティティレコード
///
/// 接続 ID → {ニックネーム, シンボル} のストア側マッピング。
/// join 時に 1 時間の TTL 付きで書き込まれ、再 join で上書き、
/// leave / disconnect で削除されます。TTL は再 join でのみ更新されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub nickname: Nickname,
    pub symbol: Symbol,
}

/// アクティビティの種別
///
/// `leaveRoom` は暗黙のアクション（disconnect 経由）であり、記録されません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    #[serde(rename = "connect")]
    Connect,
    #[serde(rename = "joinRoom")]
    JoinRoom,
    #[serde(rename = "sendMessage")]
    SendMessage,
}

/// アクティビティイベント
///
/// 書き込み専用。個別に読み返されることはなく、集計キー経由の
/// ロールアップでのみ参照されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub user_id: ClientId,
    pub action: ActivityAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// 日次統計ロールアップ
///
/// ストアに単体で保存されることはなく、読み取りのたびに
/// 5 つの集計キーから再計算されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    pub date: String,
    pub unique_users: i64,
    pub total_visits: i64,
    pub popular_symbols: Vec<String>,
    pub chat_messages: i64,
}

impl DailyStats {
    /// アクティビティが全くない日のロールアップ
    pub fn empty(date: String) -> Self {
        Self {
            date,
            unique_users: 0,
            total_visits: 0,
            popular_symbols: Vec::new(),
            chat_messages: 0,
        }
    }
}
