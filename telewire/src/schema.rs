//!
//! Representative records of the Bot API.
//!
//! These are plain data declarations. They are provided so that every codec
//! of this library has a real user: open types (see [`crate::variant`]),
//! wire enums (see [`crate::wire_enum`]), and the scalar types of
//! [`crate::types`].
//!
//! Open types found here:
//!
//! | open type                    | discriminator | tags                                          |
//! |------------------------------|---------------|-----------------------------------------------|
//! | [`MessageOrigin`]            | `type`        | user, hidden_user, chat, channel              |
//! | [`ChatMember`]               | `status`      | creator, administrator, member, restricted, left, kicked |
//! | [`ChatBoostSource`]          | `source`      | premium, gift_code, giveaway                  |
//! | [`ReactionType`]             | `type`        | emoji, custom_emoji, paid                     |
//! | [`BackgroundFill`]           | `type`        | solid, gradient, freeform_gradient            |
//! | [`BotCommandScope`]          | `type`        | default, all_private_chats, ..., chat_member  |
//! | [`InputMedia`]               | `type`        | photo, video, animation, audio, document      |
//! | [`MaybeInaccessibleMessage`] | `date`        | `0` is inaccessible, anything else a message  |
//!

pub mod chat;
pub mod media;
pub mod message;
pub mod update;

pub use chat::*;
pub use media::*;
pub use message::*;
pub use update::*;
