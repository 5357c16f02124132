//! UseCase: 統計の読み取り
//!
//! ## 責務
//!
//! - 日次・週次・月次のロールアップを集計キーから読み取り時に再計算する
//!
//! ロールアップはどこにも保存されません。集計キーが TTL で失効した
//! 過去日は、アクティビティの無かった日と区別されず全てゼロになります。
//! 未来の日付はウィンドウから除外されます（そのキーはまだ存在し得ない）。

use std::sync::Arc;

use chrono::NaiveDate;
use hiroba_shared::time::{
    Clock, days_of_month, format_date, parse_date, utc_date, utc_year_month, week_ending_at,
};

use crate::domain::keys::{chat_count_key, hourly_key, symbols_key, unique_users_key};
use crate::domain::{DailyStats, SharedStore};
use crate::usecase::error::GetStatsError;

/// 人気シンボルの取得件数（スコア降順で上位 10 件）
const TOP_SYMBOLS: isize = 10;

/// 統計の読み取り UseCase
pub struct GetStatsUseCase {
    store: Arc<dyn SharedStore>,
    clock: Arc<dyn Clock>,
}

impl GetStatsUseCase {
    pub fn new(store: Arc<dyn SharedStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 指定日（省略時は今日）のロールアップを返す
    pub async fn daily(&self, date: Option<&str>) -> Result<DailyStats, GetStatsError> {
        let date = match date {
            Some(date) => {
                parse_date(date).ok_or_else(|| GetStatsError::InvalidDate(date.to_string()))?
            }
            None => self.today(),
        };
        self.rollup(date).await
    }

    /// 指定日（省略時は今日）で終わる 7 日間のロールアップを古い順で返す
    ///
    /// 未来の日付はウィンドウから除外されます。
    pub async fn weekly(&self, end_date: Option<&str>) -> Result<Vec<DailyStats>, GetStatsError> {
        let end = match end_date {
            Some(date) => {
                parse_date(date).ok_or_else(|| GetStatsError::InvalidDate(date.to_string()))?
            }
            None => self.today(),
        };
        let today = self.today();
        let mut days = Vec::new();
        for date in week_ending_at(end) {
            if date > today {
                continue;
            }
            days.push(self.rollup(date).await?);
        }
        Ok(days)
    }

    /// 指定月（省略時は今月）の日次ロールアップを古い順で返す
    ///
    /// 未来の日付は除外されます（当月を指定すると今日までの日数分になる）。
    pub async fn monthly(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<DailyStats>, GetStatsError> {
        let (current_year, current_month) = utc_year_month(self.clock.now_utc_millis());
        let year = year.unwrap_or(current_year);
        let month = month.unwrap_or(current_month);
        let dates = days_of_month(year, month).ok_or(GetStatsError::InvalidMonth { year, month })?;

        let today = self.today();
        let mut days = Vec::new();
        for date in dates {
            if date > today {
                continue;
            }
            days.push(self.rollup(date).await?);
        }
        Ok(days)
    }

    fn today(&self) -> NaiveDate {
        utc_date(self.clock.now_utc_millis())
    }

    /// 1 日分のロールアップを集計キーから再計算
    async fn rollup(&self, date: NaiveDate) -> Result<DailyStats, GetStatsError> {
        let date = format_date(date);

        let unique_users = self.store.scard(&unique_users_key(&date)).await?;

        let chat_messages = self
            .store
            .get(&chat_count_key(&date))
            .await?
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(0);

        let popular_symbols = self
            .store
            .zrevrange_withscores(&symbols_key(&date), 0, TOP_SYMBOLS - 1)
            .await?
            .into_iter()
            .map(|(member, _score)| member)
            .collect();

        let mut total_visits = 0;
        for hour in 0..24 {
            total_visits += self
                .store
                .get(&hourly_key(&date, hour))
                .await?
                .and_then(|value| value.parse::<i64>().ok())
                .unwrap_or(0);
        }

        Ok(DailyStats {
            date,
            unique_users,
            total_visits,
            popular_symbols,
            chat_messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use crate::domain::store::MockSharedStore;
    use crate::infrastructure::store::InMemoryStore;
    use hiroba_shared::time::FixedClock;

    // 2024-01-10 12:00:00 UTC
    const NOW: i64 = 1704888000000;

    fn fixture() -> (Arc<InMemoryStore>, GetStatsUseCase) {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));
        let store = Arc::new(InMemoryStore::new(Arc::clone(&clock)));
        let usecase = GetStatsUseCase::new(store.clone(), clock);
        (store, usecase)
    }

    async fn seed_day(store: &InMemoryStore, date: &str) {
        store.sadd(&unique_users_key(date), "c1").await.unwrap();
        store.sadd(&unique_users_key(date), "c2").await.unwrap();
        store.incr(&hourly_key(date, 9)).await.unwrap();
        store.incr(&hourly_key(date, 9)).await.unwrap();
        store.incr(&hourly_key(date, 15)).await.unwrap();
        store.zincrby(&symbols_key(date), 3.0, "AAPL").await.unwrap();
        store.zincrby(&symbols_key(date), 1.0, "TSLA").await.unwrap();
        store.incr(&chat_count_key(date)).await.unwrap();
        store.incr(&chat_count_key(date)).await.unwrap();
    }

    #[tokio::test]
    async fn test_daily_rollup_aggregates_all_buckets() {
        // テスト項目: 日次ロールアップが 4 種類の集計キーを合算する
        // given (前提条件):
        let (store, usecase) = fixture();
        seed_day(&store, "2024-01-10").await;

        // when (操作):
        let stats = usecase.daily(Some("2024-01-10")).await.unwrap();

        // then (期待する結果):
        assert_eq!(stats.date, "2024-01-10");
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.popular_symbols, vec!["AAPL", "TSLA"]);
        assert_eq!(stats.chat_messages, 2);
    }

    #[tokio::test]
    async fn test_daily_defaults_to_today() {
        // テスト項目: 日付省略時に今日（UTC）のロールアップが返る
        // given (前提条件):
        let (store, usecase) = fixture();
        seed_day(&store, "2024-01-10").await;

        // when (操作):
        let stats = usecase.daily(None).await.unwrap();

        // then (期待する結果):
        assert_eq!(stats.date, "2024-01-10");
        assert_eq!(stats.unique_users, 2);
    }

    #[tokio::test]
    async fn test_daily_with_no_activity_is_all_zero() {
        // テスト項目: アクティビティの無い日のロールアップが全てゼロになる
        // given (前提条件):
        let (_store, usecase) = fixture();

        // when (操作):
        let stats = usecase.daily(Some("2024-01-05")).await.unwrap();

        // then (期待する結果):
        assert_eq!(stats, DailyStats::empty("2024-01-05".to_string()));
    }

    #[tokio::test]
    async fn test_daily_rejects_invalid_date() {
        // テスト項目: 不正な日付文字列が InvalidDate として拒否される
        // given (前提条件):
        let (_store, usecase) = fixture();

        // when (操作):
        let result = usecase.daily(Some("not-a-date")).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            GetStatsError::InvalidDate("not-a-date".to_string())
        );
    }

    #[tokio::test]
    async fn test_weekly_returns_seven_days_oldest_first() {
        // テスト項目: 週次ロールアップが 7 日分を古い順で返す
        // given (前提条件):
        let (store, usecase) = fixture();
        seed_day(&store, "2024-01-08").await;

        // when (操作):
        let days = usecase.weekly(Some("2024-01-10")).await.unwrap();

        // then (期待する結果):
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2024-01-04");
        assert_eq!(days[6].date, "2024-01-10");
        assert_eq!(days[4].unique_users, 2); // 2024-01-08
        assert_eq!(days[0].unique_users, 0);
    }

    #[tokio::test]
    async fn test_weekly_excludes_future_dates() {
        // テスト項目: 今日より先の日付が週次ウィンドウから除外される
        // given (前提条件): 今日は 2024-01-10
        let (_store, usecase) = fixture();

        // when (操作): 2024-01-12 で終わるウィンドウを要求
        let days = usecase.weekly(Some("2024-01-12")).await.unwrap();

        // then (期待する結果): 01-06 .. 01-10 の 5 日分だけが返る
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, "2024-01-06");
        assert_eq!(days[4].date, "2024-01-10");
    }

    #[tokio::test]
    async fn test_monthly_excludes_future_dates() {
        // テスト項目: 当月の月次ロールアップが今日までの日数分になる
        // given (前提条件): 今日は 2024-01-10
        let (_store, usecase) = fixture();

        // when (操作):
        let days = usecase.monthly(Some(2024), Some(1)).await.unwrap();

        // then (期待する結果):
        assert_eq!(days.len(), 10);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[9].date, "2024-01-10");
    }

    #[tokio::test]
    async fn test_monthly_defaults_to_current_month() {
        // テスト項目: 年月省略時に今月のロールアップが返る
        // given (前提条件):
        let (_store, usecase) = fixture();

        // when (操作):
        let days = usecase.monthly(None, None).await.unwrap();

        // then (期待する結果):
        assert_eq!(days[0].date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_monthly_rejects_invalid_month() {
        // テスト項目: 不正な月が InvalidMonth として拒否される
        // given (前提条件):
        let (_store, usecase) = fixture();

        // when (操作):
        let result = usecase.monthly(Some(2024), Some(13)).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            GetStatsError::InvalidMonth {
                year: 2024,
                month: 13
            }
        );
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        // テスト項目: ストア障害が GetStatsError::Store として伝搬する
        // given (前提条件):
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NOW));
        let mut mock = MockSharedStore::new();
        mock.expect_scard()
            .returning(|_| Err(StoreError::Connection("connection refused".to_string())));
        let usecase = GetStatsUseCase::new(Arc::new(mock), clock);

        // when (操作):
        let result = usecase.daily(Some("2024-01-10")).await;

        // then (期待する結果):
        assert!(matches!(result.unwrap_err(), GetStatsError::Store(_)));
    }
}
