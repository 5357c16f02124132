//! HTTP API の DTO
//!
//! 統計エンドポイントのレスポンス形式。フィールド名はワイヤ互換のため
//! camelCase を使用します。

use serde::{Deserialize, Serialize};

/// 日次統計のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatsDto {
    pub date: String,
    pub unique_users: i64,
    pub total_visits: i64,
    pub popular_symbols: Vec<String>,
    pub chat_messages: i64,
}
