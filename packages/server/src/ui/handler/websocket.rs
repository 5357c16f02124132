//! WebSocket connection handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::{ClientId, MessageContent, Nickname, Symbol},
    infrastructure::dto::websocket::{
        ClientEvent, ErrorMessage, MessageType, NewMessageMessage, RoomJoinedMessage,
        UserJoinedMessage, UserTypingMessage,
    },
    ui::state::AppState,
    usecase::SendMessageError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    ws.on_upgrade(move |socket| handle_socket(socket, state, addr, user_agent))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This handles the outbound flow: messages from other clients (via rx channel)
/// are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    addr: SocketAddr,
    user_agent: Option<String>,
) {
    // Server-assigned connection ID (opaque, never reused)
    let client_id = match ClientId::new(Uuid::new_v4().to_string()) {
        Ok(id) => id,
        Err(_) => return, // UUID は空にならない
    };

    let (sender, mut receiver) = socket.split();

    // Register this client's channel before processing any event
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_client_usecase
        .execute(
            client_id.clone(),
            tx,
            Some(addr.ip().to_string()),
            user_agent,
        )
        .await;

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Ignoring unparseable client event: {}", e);
                            continue;
                        }
                    };
                    dispatch_event(&state_clone, &client_id_clone, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive messages from other clients and send to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Final cleanup: leave rooms, drop identity, unregister the channel.
    // Peers receive no notification about the departure.
    state.disconnect_client_usecase.execute(&client_id).await;
}

async fn dispatch_event(state: &Arc<AppState>, client_id: &ClientId, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom { symbol, nickname } => {
            let (symbol, nickname) = match (Symbol::new(symbol), Nickname::new(nickname)) {
                (Ok(symbol), Ok(nickname)) => (symbol, nickname),
                _ => {
                    tracing::warn!("Client '{}' sent invalid joinRoom payload", client_id);
                    return;
                }
            };

            match state
                .join_room_usecase
                .execute(client_id, &symbol, nickname.clone())
                .await
            {
                Ok(history) => {
                    // 参加完了の応答（履歴付き、本人のみ）
                    let joined =
                        RoomJoinedMessage::new(symbol.as_str().to_string(), history);
                    let joined_json = serde_json::to_string(&joined).unwrap();
                    state.join_room_usecase.reply(client_id, &joined_json).await;

                    // 既存メンバーへの参加通知（本人以外）
                    let user_joined = UserJoinedMessage {
                        r#type: MessageType::UserJoined,
                        nickname: nickname.into_string(),
                        timestamp: state.join_room_usecase.now_millis(),
                    };
                    let user_joined_json = serde_json::to_string(&user_joined).unwrap();
                    state
                        .join_room_usecase
                        .notify_peers(client_id, &symbol, &user_joined_json)
                        .await;
                }
                Err(e) => {
                    tracing::warn!("Client '{}' failed to join room: {}", client_id, e);
                    let error = ErrorMessage::new("Failed to join room");
                    let error_json = serde_json::to_string(&error).unwrap();
                    state.join_room_usecase.reply(client_id, &error_json).await;
                }
            }
        }
        ClientEvent::LeaveRoom { symbol } => {
            let Ok(symbol) = Symbol::new(symbol) else {
                tracing::warn!("Client '{}' sent invalid leaveRoom payload", client_id);
                return;
            };
            if let Err(e) = state.leave_room_usecase.execute(client_id, &symbol).await {
                tracing::warn!("Client '{}' failed to leave room: {}", client_id, e);
            }
        }
        ClientEvent::SendMessage { message, symbol } => {
            let Ok(symbol) = Symbol::new(symbol) else {
                tracing::warn!("Client '{}' sent invalid sendMessage payload", client_id);
                return;
            };

            match state
                .send_message_usecase
                .execute(client_id, &symbol, MessageContent::new(message))
                .await
            {
                Ok(message) => {
                    let new_message = NewMessageMessage::from(message);
                    let new_message_json = serde_json::to_string(&new_message).unwrap();
                    state
                        .send_message_usecase
                        .broadcast(&symbol, &new_message_json)
                        .await;
                }
                Err(SendMessageError::UserNotFound) => {
                    // エラーは送信者本人だけに通知する
                    let error = ErrorMessage::new("User not found");
                    let error_json = serde_json::to_string(&error).unwrap();
                    state
                        .send_message_usecase
                        .reply_error(client_id, &error_json)
                        .await;
                }
                Err(e) => {
                    tracing::warn!("Client '{}' failed to send message: {}", client_id, e);
                    let error = ErrorMessage::new("Failed to send message");
                    let error_json = serde_json::to_string(&error).unwrap();
                    state
                        .send_message_usecase
                        .reply_error(client_id, &error_json)
                        .await;
                }
            }
        }
        ClientEvent::Typing { symbol, is_typing } => {
            let Ok(symbol) = Symbol::new(symbol) else {
                return;
            };
            let typing = UserTypingMessage {
                r#type: MessageType::UserTyping,
                user_id: client_id.as_str().to_string(),
                is_typing,
            };
            let typing_json = serde_json::to_string(&typing).unwrap();
            state
                .typing_usecase
                .execute(client_id, &symbol, &typing_json)
                .await;
        }
    }
}
