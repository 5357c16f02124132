//! UseCase 層
//!
//! 1 操作 = 1 構造体。各 UseCase はドメイン層の trait（`SharedStore`,
//! `RoomRegistry`, `MessagePusher`）に依存し、具体的な実装は起動時に
//! 注入されます。

pub mod activity_log;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_stats;
pub mod join_room;
pub mod leave_room;
pub mod send_message;
pub mod typing;

pub use activity_log::ActivityLogger;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{GetStatsError, JoinRoomError, SendMessageError};
pub use get_stats::GetStatsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use typing::TypingUseCase;
