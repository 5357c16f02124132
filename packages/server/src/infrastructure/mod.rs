//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装（Redis ストア、
//! インメモリストア、ソケットグループレジストリ、WebSocket pusher）と、
//! ワイヤ DTO を提供します。

pub mod dto;
pub mod pusher;
pub mod registry;
pub mod store;
