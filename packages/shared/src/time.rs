//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps in Hiroba are Unix epoch milliseconds in UTC, and all
//! statistics buckets are keyed by the UTC calendar day.

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_utc_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_millis(&self) -> i64 {
        get_utc_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_utc_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to its UTC calendar date.
///
/// Timestamps outside chrono's representable range fall back to the epoch date.
pub fn utc_date(timestamp_millis: i64) -> NaiveDate {
    DateTime::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .date_naive()
}

/// Convert a Unix timestamp (milliseconds) to a `YYYY-MM-DD` UTC date string
pub fn utc_date_string(timestamp_millis: i64) -> String {
    utc_date(timestamp_millis).format("%Y-%m-%d").to_string()
}

/// Get the UTC hour (0..=23) of a Unix timestamp (milliseconds)
pub fn utc_hour(timestamp_millis: i64) -> u32 {
    DateTime::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .hour()
}

/// Parse a `YYYY-MM-DD` date string into a calendar date
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Number of days in the given month, or `None` for an invalid year/month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_month.signed_duration_since(first).num_days() as u32)
}

/// The 7-day window ending at `end` (inclusive), oldest first
pub fn week_ending_at(end: NaiveDate) -> Vec<NaiveDate> {
    let start = end.checked_sub_days(Days::new(6)).unwrap_or(end);
    let mut dates = Vec::with_capacity(7);
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// All days of the given calendar month, or `None` for an invalid year/month
pub fn days_of_month(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let count = days_in_month(year, month)?;
    let mut dates = Vec::with_capacity(count as usize);
    for day in 1..=count {
        dates.push(NaiveDate::from_ymd_opt(year, month, day)?);
    }
    Some(dates)
}

/// Current year and month (UTC) for the given timestamp
pub fn utc_year_month(timestamp_millis: i64) -> (i32, u32) {
    let date = utc_date(timestamp_millis);
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_utc_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 1234567890123;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp = clock.now_utc_millis();

        // then (期待する結果):
        assert_eq!(timestamp, fixed_time);
    }

    #[test]
    fn test_utc_date_string_format() {
        // テスト項目: タイムスタンプが正しく YYYY-MM-DD 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 UTC in milliseconds
        let timestamp = 1672531200000;

        // when (操作):
        let result = utc_date_string(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01");
    }

    #[test]
    fn test_utc_hour_of_timestamp() {
        // テスト項目: タイムスタンプから UTC の時間 (0-23) を取得できる
        // given (前提条件):
        // 2023-01-01 15:30:00 UTC
        let timestamp = 1672531200000 + 15 * 3600 * 1000 + 30 * 60 * 1000;

        // when (操作):
        let hour = utc_hour(timestamp);

        // then (期待する結果):
        assert_eq!(hour, 15);
    }

    #[test]
    fn test_parse_date_valid_and_invalid() {
        // テスト項目: 日付文字列のパースが成功・失敗の両方で正しく動作する
        // given (前提条件):
        let valid = "2024-02-29"; // leap day
        let invalid = "2023-02-29";
        let garbage = "not-a-date";

        // when (操作):
        let parsed_valid = parse_date(valid);
        let parsed_invalid = parse_date(invalid);
        let parsed_garbage = parse_date(garbage);

        // then (期待する結果):
        assert!(parsed_valid.is_some());
        assert!(parsed_invalid.is_none());
        assert!(parsed_garbage.is_none());
    }

    #[test]
    fn test_days_in_month() {
        // テスト項目: 各月の日数が正しく計算される（閏年を含む）
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(days_in_month(2023, 1), Some(31));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 13), None);
        assert_eq!(days_in_month(2023, 0), None);
    }

    #[test]
    fn test_week_ending_at_returns_seven_days_oldest_first() {
        // テスト項目: 指定日で終わる 7 日間のウィンドウが古い順に返される
        // given (前提条件):
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        // when (操作):
        let window = week_ending_at(end);

        // then (期待する結果):
        assert_eq!(window.len(), 7);
        assert_eq!(format_date(window[0]), "2024-03-04");
        assert_eq!(format_date(window[6]), "2024-03-10");
    }

    #[test]
    fn test_days_of_month_enumerates_every_day() {
        // テスト項目: 月の全ての日が 1 日から順に列挙される
        // given (前提条件):
        let year = 2024;
        let month = 2;

        // when (操作):
        let days = days_of_month(year, month).unwrap();

        // then (期待する結果):
        assert_eq!(days.len(), 29);
        assert_eq!(format_date(days[0]), "2024-02-01");
        assert_eq!(format_date(days[28]), "2024-02-29");
    }
}
