//! DTO（Data Transfer Object）
//!
//! ワイヤ形式（WebSocket / HTTP の JSON）とドメインモデルの間の変換を担います。
//! UI 層はここの型だけを見て JSON を組み立て、ドメイン層はワイヤ形式を知りません。

pub mod conversion;
pub mod http;
pub mod websocket;
