use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::{
    wire_enum, ChatBoostUpdated, ChatId, ChatMemberUpdated, Message, MessageReactionUpdated,
    OpenType, Poll,
};


// -----------------------------------------------------------------------------
//     Commands
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        BotCommand { command: command.into(), description: description.into() }
    }
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BotCommandScopeChat {
    pub chat_id: ChatId,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BotCommandScopeChatAdministrators {
    pub chat_id: ChatId,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BotCommandScopeChatMember {
    pub chat_id: ChatId,
    pub user_id: i64,
}

/// Users for which a list of bot commands applies.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotCommandScope {
    Default,
    AllPrivateChats,
    AllGroupChats,
    AllChatAdministrators,
    Chat(BotCommandScopeChat),
    ChatAdministrators(BotCommandScopeChatAdministrators),
    ChatMember(BotCommandScopeChatMember),
}


// -----------------------------------------------------------------------------
//     Updates
// -----------------------------------------------------------------------------

/// Kind of an [`Update`], also used to filter the updates a bot receives.
///
/// Unknown update kinds are carried as `"unknown"`, which the server ignores.
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum UpdateType {
    #[default]
    Unknown,
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    MessageReaction,
    Poll,
    MyChatMember,
    ChatMember,
    ChatBoost,
}

wire_enum!(UpdateType, unknown_write = EmitUnknown, zero_on_wire);

/// An incoming update. At most one of the optional fields is present.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reaction: Option<MessageReactionUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_chat_member: Option<ChatMemberUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_member: Option<ChatMemberUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_boost: Option<ChatBoostUpdated>,
}

impl Update {
    /// Kind of the update, given by the payload that is present.
    pub fn kind(&self) -> UpdateType {
        if self.message.is_some() { UpdateType::Message }
        else if self.edited_message.is_some() { UpdateType::EditedMessage }
        else if self.channel_post.is_some() { UpdateType::ChannelPost }
        else if self.edited_channel_post.is_some() { UpdateType::EditedChannelPost }
        else if self.message_reaction.is_some() { UpdateType::MessageReaction }
        else if self.poll.is_some() { UpdateType::Poll }
        else if self.my_chat_member.is_some() { UpdateType::MyChatMember }
        else if self.chat_member.is_some() { UpdateType::ChatMember }
        else if self.chat_boost.is_some() { UpdateType::ChatBoost }
        else { UpdateType::Unknown }
    }
}
