//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::StoreError;

/// ルーム参加のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// アイデンティティレコードが存在しない（未 join または TTL 失効）
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 統計取得のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetStatsError {
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}
