//! ドメインモデル ⇔ DTO の変換

use crate::domain::{ChatMessage, DailyStats};

use super::http::DailyStatsDto;
use super::websocket::{ChatMessageDto, MessageType, NewMessageMessage, RoomJoinedMessage};

impl From<ChatMessage> for ChatMessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            nickname: message.nickname.into_string(),
            message: message.message.into_string(),
            timestamp: message.timestamp.value(),
            symbol: message.symbol.into_string(),
        }
    }
}

impl From<ChatMessage> for NewMessageMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            r#type: MessageType::NewMessage,
            id: message.id,
            nickname: message.nickname.into_string(),
            message: message.message.into_string(),
            timestamp: message.timestamp.value(),
            symbol: message.symbol.into_string(),
        }
    }
}

impl RoomJoinedMessage {
    /// join 応答を組み立てる（履歴は古い順で渡される前提）
    pub fn new(symbol: String, history: Vec<ChatMessage>) -> Self {
        Self {
            r#type: MessageType::RoomJoined,
            symbol,
            messages: history.into_iter().map(ChatMessageDto::from).collect(),
        }
    }
}

impl From<DailyStats> for DailyStatsDto {
    fn from(stats: DailyStats) -> Self {
        Self {
            date: stats.date,
            unique_users: stats.unique_users,
            total_visits: stats.total_visits,
            popular_symbols: stats.popular_symbols,
            chat_messages: stats.chat_messages,
        }
    }
}
