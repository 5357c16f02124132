//! HTTP / WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{get_daily_stats, get_monthly_stats, get_weekly_stats, health_check};
pub use websocket::websocket_handler;
