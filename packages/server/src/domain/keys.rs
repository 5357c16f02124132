//! ストア側のキーレイアウトと各キーの上限・TTL
//!
//! リレーと統計の両方がこの規約を共有します。キーの構築を一箇所に
//! 集めることで、ストア上のレイアウトをテストで固定できます。

use super::value_object::{ClientId, Symbol};

/// チャットルームキーのプレフィックス
///
/// ルーム掃引（join 時・disconnect 時）はこのプレフィックスに一致する
/// グループのみを対象にします。
pub const CHAT_ROOM_PREFIX: &str = "stock:";

/// ルーム履歴リストの最大保持件数
pub const ROOM_HISTORY_CAP: usize = 100;

/// join 時にロードする履歴の最大件数
pub const HISTORY_LOAD_LIMIT: usize = 50;

/// ルーム履歴キーの TTL（24 時間、送信のたびに更新）
pub const ROOM_TTL_SECS: i64 = 24 * 60 * 60;

/// アイデンティティレコードの TTL（1 時間、再 join でのみ更新）
pub const IDENTITY_TTL_SECS: u64 = 60 * 60;

/// 日次アクティビティログの最大保持件数
pub const DAILY_LOG_CAP: usize = 1000;

/// 日次アクティビティログ・集計キーの TTL（7 日）
pub const STATS_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// 時間別カウンタの TTL（1 日）
pub const HOURLY_TTL_SECS: i64 = 24 * 60 * 60;

/// ルーム履歴リストのキー（`stock:<symbol>`）
pub fn room_key(symbol: &Symbol) -> String {
    format!("{}{}", CHAT_ROOM_PREFIX, symbol.as_str())
}

/// アイデンティティレコードのキー（`user:<connection-id>`）
pub fn user_key(client_id: &ClientId) -> String {
    format!("user:{}", client_id.as_str())
}

/// 日次アクティビティログのキー（`logs:daily:<date>`）
pub fn daily_log_key(date: &str) -> String {
    format!("logs:daily:{}", date)
}

/// 時間別カウンタのキー（`stats:hourly:<date>:<hour>`）
pub fn hourly_key(date: &str, hour: u32) -> String {
    format!("stats:hourly:{}:{}", date, hour)
}

/// 日次ユニークユーザ集合のキー（`stats:unique:<date>`）
pub fn unique_users_key(date: &str) -> String {
    format!("stats:unique:{}", date)
}

/// 日次シンボル人気度ソート済みセットのキー（`stats:symbols:<date>`）
pub fn symbols_key(date: &str) -> String {
    format!("stats:symbols:{}", date)
}

/// 日次チャットメッセージカウンタのキー（`stats:chat:<date>`）
pub fn chat_count_key(date: &str) -> String {
    format!("stats:chat:{}", date)
}
