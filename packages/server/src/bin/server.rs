//! Symbol-scoped WebSocket chat relay with Redis-backed shared state.
//!
//! Clients join per-symbol rooms, exchange messages with bounded history,
//! and activity is aggregated into TTL-scoped statistics.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --redis-url redis://localhost:6379/0
//! ```

use std::sync::Arc;

use clap::Parser;

use hiroba_server::{
    infrastructure::{
        pusher::WebSocketMessagePusher,
        registry::InProcessRoomRegistry,
        store::{RedisConfig, RedisStore},
    },
    ui::Server,
    usecase::{
        ActivityLogger, ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, TypingUseCase,
    },
};
use hiroba_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Symbol-scoped WebSocket chat relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Redis connection URL
    #[arg(long, default_value = "redis://127.0.0.1:6379/0")]
    redis_url: String,

    /// Disable activity logging (relay keeps working, stats stay empty)
    #[arg(long, default_value_t = false)]
    disable_activity_log: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. SharedStore (Redis)
    // 2. RoomRegistry / MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create SharedStore (Redis)
    let config = RedisConfig {
        url: args.redis_url.clone(),
    };
    let store = match RedisStore::new(&config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Invalid Redis URL '{}': {}", args.redis_url, e);
            std::process::exit(1);
        }
    };
    // 起動時に接続できなくても劣化モードで起動する（接続は後から遅延再試行）
    match store.connect().await {
        Ok(()) => tracing::info!("Connected to Redis at {}", args.redis_url),
        Err(e) => tracing::warn!(
            "Redis unavailable at startup, continuing in degraded mode: {}",
            e
        ),
    }

    // 2. Create RoomRegistry and MessagePusher
    let registry = Arc::new(InProcessRoomRegistry::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 3. Create UseCases
    let activity = Arc::new(ActivityLogger::new(
        store.clone(),
        !args.disable_activity_log,
        clock.clone(),
    ));
    if args.disable_activity_log {
        tracing::info!("Activity logging is disabled");
    }
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        pusher.clone(),
        activity.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
        activity.clone(),
        clock.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone(), store.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        store.clone(),
        pusher.clone(),
        activity.clone(),
        clock.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(registry.clone(), pusher.clone()));
    let get_stats_usecase = Arc::new(GetStatsUseCase::new(store.clone(), clock.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        join_room_usecase,
        leave_room_usecase,
        send_message_usecase,
        typing_usecase,
        get_stats_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
