//! UseCase: アクティビティログの記録
//!
//! ## 責務
//!
//! - アクティビティイベント 1 件を、当日の生ログと 4 種類の集計キーに
//!   1 バッチ（1 往復）で書き込む
//! - リレー経路から切り離して記録する（記録の失敗がチャットを止めない）
//!
//! ## 失敗の扱い
//!
//! `record_detached` はストア障害を握りつぶして warn ログと失敗カウンタに
//! 残すだけです。アクティビティログは尽力ベースであり、損失を許容します。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hiroba_shared::time::{Clock, utc_date_string, utc_hour};

use crate::domain::keys::{
    DAILY_LOG_CAP, HOURLY_TTL_SECS, STATS_TTL_SECS, chat_count_key, daily_log_key, hourly_key,
    symbols_key, unique_users_key,
};
use crate::domain::{ActivityAction, ActivityEvent, SharedStore, StoreBatch, StoreError};

/// アクティビティログの記録 UseCase
pub struct ActivityLogger {
    store: Arc<dyn SharedStore>,
    /// false の場合、記録は黙ってスキップされる（運用スイッチ）
    enabled: bool,
    clock: Arc<dyn Clock>,
    failed_writes: AtomicU64,
}

impl ActivityLogger {
    pub fn new(store: Arc<dyn SharedStore>, enabled: bool, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            enabled,
            clock,
            failed_writes: AtomicU64::new(0),
        }
    }

    /// 現在時刻のタイムスタンプでイベントを組み立てる
    pub fn event(
        &self,
        user_id: crate::domain::ClientId,
        action: ActivityAction,
        symbol: Option<crate::domain::Symbol>,
        ip: Option<String>,
        user_agent: Option<String>,
    ) -> ActivityEvent {
        ActivityEvent {
            user_id,
            action,
            symbol,
            timestamp: crate::domain::Timestamp::new(self.clock.now_utc_millis()),
            ip,
            user_agent,
        }
    }

    /// イベント 1 件を記録する
    ///
    /// 書き込み内容（イベントの日付・時間のバケットに対して）:
    /// - 生ログ: lpush + ltrim（最新 1000 件）+ expire 7 日
    /// - 時間別訪問カウンタ: incr + expire 1 日
    /// - ユニークユーザ集合: sadd + expire 7 日
    /// - シンボル人気度: zincrby + expire 7 日（symbol があるイベントのみ）
    /// - チャット件数: incr + expire 7 日（sendMessage のみ）
    pub async fn record(&self, event: ActivityEvent) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }

        let date = utc_date_string(event.timestamp.value());
        let hour = utc_hour(event.timestamp.value());
        let payload =
            serde_json::to_string(&event).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut batch = StoreBatch::new();
        batch
            .lpush(daily_log_key(&date), payload)
            .ltrim(daily_log_key(&date), 0, DAILY_LOG_CAP as isize - 1)
            .expire(daily_log_key(&date), STATS_TTL_SECS)
            .incr(hourly_key(&date, hour))
            .expire(hourly_key(&date, hour), HOURLY_TTL_SECS)
            .sadd(unique_users_key(&date), event.user_id.as_str())
            .expire(unique_users_key(&date), STATS_TTL_SECS);
        if let Some(symbol) = &event.symbol {
            batch
                .zincrby(symbols_key(&date), 1.0, symbol.as_str())
                .expire(symbols_key(&date), STATS_TTL_SECS);
        }
        if event.action == ActivityAction::SendMessage {
            batch
                .incr(chat_count_key(&date))
                .expire(chat_count_key(&date), STATS_TTL_SECS);
        }

        self.store.submit(batch).await
    }

    /// イベントをリレー経路から切り離して記録する
    ///
    /// 失敗は warn ログと `failed_writes` カウンタに残すのみ。
    pub fn record_detached(self: &Arc<Self>, event: ActivityEvent) {
        let logger = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = logger.record(event).await {
                logger.failed_writes.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Failed to record activity event: {}", e);
            }
        });
    }

    /// 切り離し記録の累計失敗回数
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }
}
