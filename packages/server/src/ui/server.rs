//! Server execution logic.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase, JoinRoomUseCase,
    LeaveRoomUseCase, SendMessageUseCase, TypingUseCase,
};

use super::{
    handler::{
        get_daily_stats, get_monthly_stats, get_weekly_stats, health_check, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     join_room_usecase,
///     leave_room_usecase,
///     send_message_usecase,
///     typing_usecase,
///     get_stats_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    connect_client_usecase: Arc<ConnectClientUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    join_room_usecase: Arc<JoinRoomUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    typing_usecase: Arc<TypingUseCase>,
    get_stats_usecase: Arc<GetStatsUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        typing_usecase: Arc<TypingUseCase>,
        get_stats_usecase: Arc<GetStatsUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            join_room_usecase,
            leave_room_usecase,
            send_message_usecase,
            typing_usecase,
            get_stats_usecase,
        }
    }

    /// Run the WebSocket chat relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            send_message_usecase: self.send_message_usecase,
            typing_usecase: self.typing_usecase,
            get_stats_usecase: self.get_stats_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats/daily", get(get_daily_stats))
            .route("/api/stats/weekly", get(get_weekly_stats))
            .route("/api/stats/monthly", get(get_monthly_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
