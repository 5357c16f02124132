//! 値オブジェクト
//!
//! 各値オブジェクトはコンストラクタでバリデーションを行い、
//! 不正な値がドメイン層に入り込まないようにします。
//!
//! メッセージ本文（`MessageContent`）にはバリデーションがありません。
//! このレイヤーでの送信の検証はアイデンティティの存在確認のみであり、
//! 文字数制限や内容フィルタリングは行いません。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("client id must not be empty")]
    EmptyClientId,
    #[error("symbol must not be empty")]
    EmptySymbol,
    #[error("nickname must not be empty")]
    EmptyNickname,
}

/// 接続 ID
///
/// トランスポート層（WebSocket upgrade）が接続ごとに割り当てる不透明な ID。
/// 切断後は再利用されません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 銘柄シンボル
///
/// ルームの識別子。大文字化や形式チェックは行わず、クライアントが
/// 送ってきた文字列をそのまま使用します（空文字のみ拒否）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::EmptySymbol);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 表示ニックネーム
///
/// クライアントが join 時に申告する認証されていない表示名。
/// 再 join によってのみ変更できます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(value: String) -> Result<Self, ValueError> {
        if value.trim().is_empty() {
            return Err(ValueError::EmptyNickname);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// メッセージ本文（制限なし）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_rejects_empty() {
        // テスト項目: 空の client_id が拒否される
        // given (前提条件):
        let empty = "".to_string();
        let whitespace = "   ".to_string();

        // when (操作):
        let result_empty = ClientId::new(empty);
        let result_whitespace = ClientId::new(whitespace);

        // then (期待する結果):
        assert_eq!(result_empty, Err(ValueError::EmptyClientId));
        assert_eq!(result_whitespace, Err(ValueError::EmptyClientId));
    }

    #[test]
    fn test_client_id_accepts_valid_value() {
        // テスト項目: 有効な client_id が受け入れられる
        // given (前提条件):
        let value = "550e8400-e29b-41d4-a716-446655440000".to_string();

        // when (操作):
        let client_id = ClientId::new(value.clone()).unwrap();

        // then (期待する結果):
        assert_eq!(client_id.as_str(), value);
    }

    #[test]
    fn test_symbol_rejects_empty() {
        // テスト項目: 空のシンボルが拒否される
        // given (前提条件):
        let empty = "".to_string();

        // when (操作):
        let result = Symbol::new(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueError::EmptySymbol));
    }

    #[test]
    fn test_symbol_passes_through_as_supplied() {
        // テスト項目: シンボルは大文字化などの変換をされずそのまま保持される
        // given (前提条件):
        let value = "aapl".to_string();

        // when (操作):
        let symbol = Symbol::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(symbol.as_str(), "aapl");
    }

    #[test]
    fn test_nickname_rejects_empty() {
        // テスト項目: 空のニックネームが拒否される
        // given (前提条件):
        let empty = "".to_string();

        // when (操作):
        let result = Nickname::new(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueError::EmptyNickname));
    }

    #[test]
    fn test_message_content_has_no_limits() {
        // テスト項目: メッセージ本文は空文字や長文でも受け入れられる
        // given (前提条件):
        let empty = "".to_string();
        let long = "x".repeat(100_000);

        // when (操作):
        let content_empty = MessageContent::new(empty);
        let content_long = MessageContent::new(long.clone());

        // then (期待する結果):
        assert_eq!(content_empty.as_str(), "");
        assert_eq!(content_long.as_str(), long);
    }

    #[test]
    fn test_timestamp_serializes_as_plain_number() {
        // テスト項目: Timestamp が JSON 上で数値としてシリアライズされる
        // given (前提条件):
        let timestamp = Timestamp::new(1700000000000);

        // when (操作):
        let json = serde_json::to_string(&timestamp).unwrap();

        // then (期待する結果):
        assert_eq!(json, "1700000000000");
    }
}
