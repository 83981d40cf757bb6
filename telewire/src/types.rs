//!
//! Scalar types with a non-trivial wire representation.
//!

pub mod chat_id;
pub mod color;
pub mod time;

pub use chat_id::{ChatId, InvalidChatId};
pub use color::{Color, InvalidColor};
pub use time::{ban_time, InvalidTimestamp, Timestamp};
