//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase, JoinRoomUseCase,
    LeaveRoomUseCase, SendMessageUseCase, TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（タイピング中継のユースケース）
    pub typing_usecase: Arc<TypingUseCase>,
    /// GetStatsUseCase（統計取得のユースケース）
    pub get_stats_usecase: Arc<GetStatsUseCase>,
}
