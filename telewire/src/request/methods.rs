use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::request::BotRequest;
use crate::{
    BotCommand, BotCommandScope, ChatAction, ChatId, Color, DiceEmoji, File, ForumTopic,
    InputFile, InputMedia, InputSticker, Message, MessageEntity, ParseMode, ReactionType,
    StickerFormat, Update, UpdateType,
};


// -----------------------------------------------------------------------------
//     Updates
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Default, Serialize)]
pub struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<UpdateType>>,
}

impl BotRequest for GetUpdates {
    type Response = Vec<Update>;
    const METHOD: &'static str = "getUpdates";
}


// -----------------------------------------------------------------------------
//     Messages
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MessageEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl SendMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        SendMessage {
            chat_id,
            message_thread_id: None,
            text: text.into(),
            parse_mode: None,
            entities: None,
            disable_notification: None,
        }
    }
}

impl BotRequest for SendMessage {
    type Response = Message;
    const METHOD: &'static str = "sendMessage";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SendPhoto {
    pub chat_id: ChatId,
    pub photo: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_spoiler: Option<bool>,
}

impl SendPhoto {
    pub fn new(chat_id: ChatId, photo: InputFile) -> Self {
        SendPhoto { chat_id, photo, caption: None, parse_mode: None, has_spoiler: None }
    }
}

impl BotRequest for SendPhoto {
    type Response = Message;
    const METHOD: &'static str = "sendPhoto";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SendMediaGroup {
    pub chat_id: ChatId,
    pub media: Vec<InputMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl BotRequest for SendMediaGroup {
    type Response = Vec<Message>;
    const METHOD: &'static str = "sendMediaGroup";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SendDice {
    pub chat_id: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<DiceEmoji>,
}

impl BotRequest for SendDice {
    type Response = Message;
    const METHOD: &'static str = "sendDice";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SendChatAction {
    pub chat_id: ChatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    pub action: ChatAction,
}

impl BotRequest for SendChatAction {
    type Response = bool;
    const METHOD: &'static str = "sendChatAction";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SetMessageReaction {
    pub chat_id: ChatId,
    pub message_id: i64,
    pub reaction: Vec<ReactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_big: Option<bool>,
}

impl BotRequest for SetMessageReaction {
    type Response = bool;
    const METHOD: &'static str = "setMessageReaction";
}


// -----------------------------------------------------------------------------
//     Chats
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct BanChatMember {
    pub chat_id: ChatId,
    pub user_id: i64,
    /// `None` bans the user forever.
    #[serde(with = "crate::types::ban_time")]
    pub until_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoke_messages: Option<bool>,
}

impl BotRequest for BanChatMember {
    type Response = bool;
    const METHOD: &'static str = "banChatMember";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CreateForumTopic {
    pub chat_id: ChatId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_custom_emoji_id: Option<String>,
}

impl BotRequest for CreateForumTopic {
    type Response = ForumTopic;
    const METHOD: &'static str = "createForumTopic";
}


// -----------------------------------------------------------------------------
//     Bot settings and stickers
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SetMyCommands {
    pub commands: Vec<BotCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<BotCommandScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl BotRequest for SetMyCommands {
    type Response = bool;
    const METHOD: &'static str = "setMyCommands";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct UploadStickerFile {
    pub user_id: i64,
    pub sticker: InputFile,
    pub sticker_format: StickerFormat,
}

impl BotRequest for UploadStickerFile {
    type Response = File;
    const METHOD: &'static str = "uploadStickerFile";
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct AddStickerToSet {
    pub user_id: i64,
    pub name: String,
    pub sticker: InputSticker,
}

impl BotRequest for AddStickerToSet {
    type Response = bool;
    const METHOD: &'static str = "addStickerToSet";
}
