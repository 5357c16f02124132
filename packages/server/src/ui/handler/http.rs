//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    infrastructure::dto::http::DailyStatsDto,
    ui::state::AppState,
    usecase::GetStatsError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// ウィンドウの最終日（歴史的事情で startDate という名前）
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Get the daily stats rollup (defaults to today, UTC)
pub async fn get_daily_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<DailyStatsDto>, StatusCode> {
    let stats = state
        .get_stats_usecase
        .daily(query.date.as_deref())
        .await
        .map_err(status_for)?;
    Ok(Json(DailyStatsDto::from(stats)))
}

/// Get the 7-day stats window ending at the given date (defaults to today)
pub async fn get_weekly_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<Vec<DailyStatsDto>>, StatusCode> {
    let days = state
        .get_stats_usecase
        .weekly(query.start_date.as_deref())
        .await
        .map_err(status_for)?;
    Ok(Json(days.into_iter().map(DailyStatsDto::from).collect()))
}

/// Get the per-day stats for a calendar month (defaults to the current month)
pub async fn get_monthly_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<Vec<DailyStatsDto>>, StatusCode> {
    let days = state
        .get_stats_usecase
        .monthly(query.year, query.month)
        .await
        .map_err(status_for)?;
    Ok(Json(days.into_iter().map(DailyStatsDto::from).collect()))
}

fn status_for(error: GetStatsError) -> StatusCode {
    match error {
        GetStatsError::InvalidDate(_) | GetStatsError::InvalidMonth { .. } => {
            StatusCode::BAD_REQUEST
        }
        GetStatsError::Store(e) => {
            tracing::error!("Failed to read stats from store: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
