//! WebSocket ワイヤ形式の DTO
//!
//! サーバ → クライアントのメッセージは `type` フィールドで種別を示す
//! JSON オブジェクト、クライアント → サーバのイベントは `type` タグ付きの
//! enum として定義します。

use serde::{Deserialize, Serialize};

/// サーバ → クライアントのメッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "roomJoined")]
    RoomJoined,
    #[serde(rename = "userJoined")]
    UserJoined,
    #[serde(rename = "newMessage")]
    NewMessage,
    #[serde(rename = "userTyping")]
    UserTyping,
    #[serde(rename = "error")]
    Error,
}

/// チャットメッセージの DTO（履歴・配信の両方で同一形式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub nickname: String,
    pub message: String,
    pub timestamp: i64,
    pub symbol: String,
}

/// join 完了時に参加者本人へ返すメッセージ
///
/// `messages` は直近の履歴（古い順、最大 50 件）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJoinedMessage {
    pub r#type: MessageType,
    pub symbol: String,
    pub messages: Vec<ChatMessageDto>,
}

/// 新しい参加者をルームの既存メンバーに通知するメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoinedMessage {
    pub r#type: MessageType,
    pub nickname: String,
    pub timestamp: i64,
}

/// チャットメッセージの配信（送信者本人を含む全メンバーへ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageMessage {
    pub r#type: MessageType,
    pub id: String,
    pub nickname: String,
    pub message: String,
    pub timestamp: i64,
    pub symbol: String,
}

/// タイピング中インジケータ（送信者以外のメンバーへ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub is_typing: bool,
}

/// エラー通知（送信者本人のみへ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
        }
    }
}

/// クライアント → サーバのイベント
///
/// 未知の `type` やフィールド不足はデシリアライズエラーになり、
/// ハンドラ側で黙って無視されます。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "joinRoom")]
    JoinRoom { symbol: String, nickname: String },
    #[serde(rename = "leaveRoom")]
    LeaveRoom { symbol: String },
    #[serde(rename = "sendMessage")]
    SendMessage { message: String, symbol: String },
    #[serde(rename = "typing")]
    #[serde(rename_all = "camelCase")]
    Typing { symbol: String, is_typing: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_join_room_deserializes() {
        // テスト項目: joinRoom イベントがデシリアライズできる
        // given (前提条件):
        let json = r#"{"type":"joinRoom","symbol":"AAPL","nickname":"alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                symbol: "AAPL".to_string(),
                nickname: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_client_event_typing_uses_camel_case() {
        // テスト項目: typing イベントの isTyping フィールドが camelCase で読める
        // given (前提条件):
        let json = r#"{"type":"typing","symbol":"AAPL","isTyping":true}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Typing {
                symbol: "AAPL".to_string(),
                is_typing: true,
            }
        );
    }

    #[test]
    fn test_client_event_unknown_type_is_rejected() {
        // テスト項目: 未知の type がデシリアライズエラーになる
        // given (前提条件):
        let json = r#"{"type":"unknownEvent","symbol":"AAPL"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_error_message_wire_format() {
        // テスト項目: エラー通知が {"type":"error","message":...} の形式になる
        // given (前提条件):
        let message = ErrorMessage::new("User not found");

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"error","message":"User not found"}"#);
    }

    #[test]
    fn test_user_typing_message_wire_format() {
        // テスト項目: タイピング通知が userId / isTyping の camelCase で出力される
        // given (前提条件):
        let message = UserTypingMessage {
            r#type: MessageType::UserTyping,
            user_id: "c1".to_string(),
            is_typing: true,
        };

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "userTyping");
        assert_eq!(json["userId"], "c1");
        assert_eq!(json["isTyping"], true);
    }

    #[test]
    fn test_room_joined_message_wire_format() {
        // テスト項目: roomJoined メッセージが履歴を含む期待形式で出力される
        // given (前提条件):
        let message = RoomJoinedMessage {
            r#type: MessageType::RoomJoined,
            symbol: "AAPL".to_string(),
            messages: vec![ChatMessageDto {
                id: "c1-1000".to_string(),
                nickname: "alice".to_string(),
                message: "hello".to_string(),
                timestamp: 1000,
                symbol: "AAPL".to_string(),
            }],
        };

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "roomJoined");
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["messages"][0]["id"], "c1-1000");
        assert_eq!(json["messages"][0]["nickname"], "alice");
    }
}
