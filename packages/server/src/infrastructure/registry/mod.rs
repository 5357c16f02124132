//! RoomRegistry 実装

pub mod inprocess;

pub use inprocess::InProcessRoomRegistry;
