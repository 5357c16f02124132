//! ドメイン層
//!
//! 値オブジェクト、エンティティ、およびインフラ層が実装する trait
//! （依存性の逆転）を定義します。

pub mod entity;
pub mod keys;
pub mod pusher;
pub mod registry;
pub mod store;
pub mod value_object;

pub use entity::{ActivityAction, ActivityEvent, ChatMessage, DailyStats, IdentityRecord};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::RoomRegistry;
pub use store::{BatchCommand, SharedStore, StoreBatch, StoreError};
pub use value_object::{ClientId, MessageContent, Nickname, Symbol, Timestamp};
