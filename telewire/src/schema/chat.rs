use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::types::ban_time;
use crate::{wire_enum, ChatId, Color, OpenType, Timestamp};


#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ChatType {
    #[default]
    Unknown,
    Private,
    Group,
    Supergroup,
    Channel,
}

wire_enum!(ChatType, unknown_write = Fail);

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_forum: Option<bool>,
}

impl Chat {
    /// Identifier to use when sending requests to this chat.
    pub fn chat_id(&self) -> ChatId {
        ChatId::Id(self.id)
    }
}

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ChatAction {
    #[default]
    Unknown,
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
}

wire_enum!(ChatAction, unknown_write = Fail);


// -----------------------------------------------------------------------------
//     Chat members
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberOwner {
    pub user: User,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberAdministrator {
    pub user: User,
    pub can_be_edited: bool,
    pub is_anonymous: bool,
    pub can_manage_chat: bool,
    pub can_delete_messages: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberMember {
    pub user: User,
    /// End of the subscription of the member, if any.
    #[serde(default, with = "ban_time")]
    pub until_date: Option<DateTime<Utc>>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberRestricted {
    pub user: User,
    pub is_member: bool,
    pub can_send_messages: bool,
    pub can_send_photos: bool,
    pub can_add_web_page_previews: bool,
    /// `None` if the restrictions are permanent.
    #[serde(default, with = "ban_time")]
    pub until_date: Option<DateTime<Utc>>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberLeft {
    pub user: User,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberBanned {
    pub user: User,
    /// `None` if the user is banned forever.
    #[serde(default, with = "ban_time")]
    pub until_date: Option<DateTime<Utc>>,
}

/// Information about one member of a chat, selected by its `status`.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatMember {
    #[serde(rename = "creator")]
    Owner(ChatMemberOwner),
    Administrator(ChatMemberAdministrator),
    Member(ChatMemberMember),
    Restricted(ChatMemberRestricted),
    Left(ChatMemberLeft),
    #[serde(rename = "kicked")]
    Banned(ChatMemberBanned),
}

impl ChatMember {
    pub fn user(&self) -> &User {
        match self {
            ChatMember::Owner(m) => &m.user,
            ChatMember::Administrator(m) => &m.user,
            ChatMember::Member(m) => &m.user,
            ChatMember::Restricted(m) => &m.user,
            ChatMember::Left(m) => &m.user,
            ChatMember::Banned(m) => &m.user,
        }
    }
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub from: User,
    pub date: Timestamp,
    pub old_chat_member: ChatMember,
    pub new_chat_member: ChatMember,
}


// -----------------------------------------------------------------------------
//     Boosts
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourcePremium {
    pub user: User,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourceGiftCode {
    pub user: User,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostSourceGiveaway {
    pub giveaway_message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unclaimed: Option<bool>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ChatBoostSource {
    Premium(ChatBoostSourcePremium),
    GiftCode(ChatBoostSourceGiftCode),
    Giveaway(ChatBoostSourceGiveaway),
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoost {
    pub boost_id: String,
    pub add_date: Timestamp,
    pub expiration_date: Timestamp,
    pub source: ChatBoostSource,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChatBoostUpdated {
    pub chat: Chat,
    pub boost: ChatBoost,
}


// -----------------------------------------------------------------------------
//     Backgrounds and topics
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundFillSolid {
    pub color: Color,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundFillGradient {
    pub top_color: Color,
    pub bottom_color: Color,
    /// Clockwise rotation angle of the gradient, in degrees (0-359).
    pub rotation_angle: u16,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundFillFreeformGradient {
    pub colors: Vec<Color>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundFill {
    Solid(BackgroundFillSolid),
    Gradient(BackgroundFillGradient),
    FreeformGradient(BackgroundFillFreeformGradient),
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ForumTopic {
    pub message_thread_id: i64,
    pub name: String,
    pub icon_color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_custom_emoji_id: Option<String>,
}
