//! SharedStore trait 定義
//!
//! 共有ストア（Redis）への型付きインターフェース。文字列・リスト・
//! カウンタ・セット・ソート済みセットの操作と、複数の書き込みを
//! 1 往復にまとめるバッチ送信を提供します。
//!
//! ## 依存性の逆転（DIP）
//!
//! - ドメイン層が必要とするインターフェースをドメイン層自身が定義
//! - Infrastructure 層（Redis 実装・インメモリ実装）がこの trait に依存
//!
//! ## 失敗の扱い
//!
//! 接続エラーは全て `StoreError` として呼び出し元に伝搬します。
//! クライアント内部ではリトライしません。チャットに必須の経路では
//! 致命的エラーとして扱い、統計経路では握りつぶしてログに残すかは
//! 呼び出し元が決めます。

use async_trait::async_trait;
use thiserror::Error;

/// 共有ストアのエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// ストアへの接続・コマンド実行の失敗
    #[error("store connection error: {0}")]
    Connection(String),
    /// 値のシリアライズ・デシリアライズの失敗
    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// バッチに積める書き込みコマンド
///
/// 送信順に実行されますが、コマンド間のアトミック性は順序以外に
/// 保証されません（パイプラインであってトランザクションではない）。
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCommand {
    LPush { key: String, value: String },
    LTrim { key: String, start: isize, stop: isize },
    Expire { key: String, seconds: i64 },
    Incr { key: String },
    SAdd { key: String, member: String },
    ZIncrBy { key: String, delta: f64, member: String },
}

/// 独立した書き込みコマンドの列
///
/// `SharedStore::submit` で 1 ネットワーク往復として送信されます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreBatch {
    commands: Vec<BatchCommand>,
}

impl StoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lpush(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.commands.push(BatchCommand::LPush {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn ltrim(&mut self, key: impl Into<String>, start: isize, stop: isize) -> &mut Self {
        self.commands.push(BatchCommand::LTrim {
            key: key.into(),
            start,
            stop,
        });
        self
    }

    pub fn expire(&mut self, key: impl Into<String>, seconds: i64) -> &mut Self {
        self.commands.push(BatchCommand::Expire {
            key: key.into(),
            seconds,
        });
        self
    }

    pub fn incr(&mut self, key: impl Into<String>) -> &mut Self {
        self.commands.push(BatchCommand::Incr { key: key.into() });
        self
    }

    pub fn sadd(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(BatchCommand::SAdd {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn zincrby(
        &mut self,
        key: impl Into<String>,
        delta: f64,
        member: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(BatchCommand::ZIncrBy {
            key: key.into(),
            delta,
            member: member.into(),
        });
        self
    }

    pub fn commands(&self) -> &[BatchCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// 共有ストア trait
///
/// クロスコネクション状態（履歴・アイデンティティ・統計）の唯一の
/// 信頼できる情報源。プロセス内のソケットグループはファンアウト用の
/// 派生キャッシュに過ぎません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// 文字列値を取得（キーが無ければ `None`）
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 文字列値を設定（`ttl_secs` があれば有効期限付き）
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), StoreError>;

    /// キーを削除（存在しなくてもエラーにならない）
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// リストの先頭に値を追加
    async fn lpush(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// リストの範囲を取得（新しい順、両端含む）
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StoreError>;

    /// リストを指定範囲に切り詰め
    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError>;

    /// キーに TTL を設定
    async fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError>;

    /// カウンタをインクリメントし、新しい値を返す
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// セットにメンバーを追加
    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// セットの要素数を取得
    async fn scard(&self, key: &str) -> Result<i64, StoreError>;

    /// ソート済みセットのメンバーのスコアを加算
    async fn zincrby(&self, key: &str, delta: f64, member: &str) -> Result<(), StoreError>;

    /// スコア降順でメンバーとスコアを取得（両端含む）
    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, f64)>, StoreError>;

    /// バッチを 1 往復で送信
    ///
    /// 部分的な失敗はバッチ全体の失敗として扱われます。
    async fn submit(&self, batch: StoreBatch) -> Result<(), StoreError>;
}
