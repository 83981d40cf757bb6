use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumIter, IntoStaticStr};

use crate::variant::{self, InvalidDiscriminatorSnafu, VariantError};
use crate::{wire_enum, Chat, JsonMap, JsonValue, OpenType, PhotoSize, Sticker, Timestamp, User};


// -----------------------------------------------------------------------------
//     Enums
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Unknown,
    #[strum(serialize = "Markdown")]
    Markdown,
    #[strum(serialize = "MarkdownV2")]
    MarkdownV2,
    #[strum(serialize = "HTML")]
    Html,
}

wire_enum!(ParseMode, unknown_write = Fail);

/// Type of a [`MessageEntity`].
///
/// New entity types are regularly added to the Bot API, entities received with
/// a type unknown to this library are written back as `"unknown"`.
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageEntityType {
    #[default]
    Unknown,
    Mention,
    Hashtag,
    Cashtag,
    BotCommand,
    Url,
    Email,
    PhoneNumber,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Spoiler,
    Blockquote,
    ExpandableBlockquote,
    Code,
    Pre,
    TextLink,
    TextMention,
    CustomEmoji,
}

wire_enum!(MessageEntityType, unknown_write = EmitUnknown);

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
pub enum DiceEmoji {
    #[default]
    Unknown,
    #[strum(serialize = "🎲")]
    Dice,
    #[strum(serialize = "🎯")]
    Darts,
    #[strum(serialize = "🏀")]
    Basketball,
    #[strum(serialize = "⚽")]
    Football,
    #[strum(serialize = "🎳")]
    Bowling,
    #[strum(serialize = "🎰")]
    SlotMachine,
}

wire_enum!(DiceEmoji, unknown_write = Fail);

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PollType {
    #[default]
    Unknown,
    Regular,
    Quiz,
}

wire_enum!(PollType, unknown_write = EmitUnknown);


// -----------------------------------------------------------------------------
//     Message content
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: MessageEntityType,
    pub offset: u32,
    pub length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_emoji_id: Option<String>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Dice {
    pub emoji: DiceEmoji,
    pub value: u8,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: u32,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub total_voter_count: u32,
    pub is_closed: bool,
    pub is_anonymous: bool,
    #[serde(rename = "type")]
    pub kind: PollType,
    pub allows_multiple_answers: bool,
}


// -----------------------------------------------------------------------------
//     Message origin
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageOriginUser {
    pub date: Timestamp,
    pub sender_user: User,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageOriginHiddenUser {
    pub date: Timestamp,
    pub sender_user_name: String,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageOriginChat {
    pub date: Timestamp,
    pub sender_chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_signature: Option<String>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageOriginChannel {
    pub date: Timestamp,
    pub chat: Chat,
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_signature: Option<String>,
}

/// Origin of a forwarded message.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageOrigin {
    User(MessageOriginUser),
    HiddenUser(MessageOriginHiddenUser),
    Chat(MessageOriginChat),
    Channel(MessageOriginChannel),
}


// -----------------------------------------------------------------------------
//     Reactions
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReactionTypeEmoji {
    pub emoji: String,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReactionTypeCustomEmoji {
    pub custom_emoji_id: String,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactionType {
    Emoji(ReactionTypeEmoji),
    CustomEmoji(ReactionTypeCustomEmoji),
    Paid,
}

impl ReactionType {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        ReactionType::Emoji(ReactionTypeEmoji { emoji: emoji.into() })
    }
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MessageReactionUpdated {
    pub chat: Chat,
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub date: Timestamp,
    pub old_reaction: Vec<ReactionType>,
    pub new_reaction: Vec<ReactionType>,
}


// -----------------------------------------------------------------------------
//     Messages
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_chat: Option<Chat>,
    pub date: Timestamp,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "variant::nullable")]
    pub forward_origin: Option<MessageOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<MaybeInaccessibleMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MessageEntity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<Dice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
}

impl Message {
    /// Build a text message, all the optional fields being left empty.
    pub fn text(message_id: i64, date: Timestamp, chat: Chat, text: impl Into<String>) -> Self {
        Message {
            message_id,
            message_thread_id: None,
            from: None,
            sender_chat: None,
            date,
            chat,
            forward_origin: None,
            reply_to_message: None,
            pinned_message: None,
            edit_date: None,
            text: Some(text.into()),
            entities: None,
            caption: None,
            photo: None,
            sticker: None,
            dice: None,
            poll: None,
        }
    }
}

/// A message that was deleted or is otherwise inaccessible to the bot.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InaccessibleMessage {
    pub chat: Chat,
    pub message_id: i64,
}

/// Either a [`Message`] or an [`InaccessibleMessage`].
///
/// There is no tag on the wire: inaccessible messages are the ones with a
/// `date` of `0`.
#[derive(PartialEq, Debug, Clone)]
pub enum MaybeInaccessibleMessage {
    Message(Message),
    Inaccessible(InaccessibleMessage),
}

impl MaybeInaccessibleMessage {
    pub fn chat(&self) -> &Chat {
        match self {
            MaybeInaccessibleMessage::Message(m) => &m.chat,
            MaybeInaccessibleMessage::Inaccessible(m) => &m.chat,
        }
    }

    pub fn message_id(&self) -> i64 {
        match self {
            MaybeInaccessibleMessage::Message(m) => m.message_id,
            MaybeInaccessibleMessage::Inaccessible(m) => m.message_id,
        }
    }
}

impl OpenType for MaybeInaccessibleMessage {
    const NAME: &'static str = "MaybeInaccessibleMessage";
    const DISCRIMINATOR: &'static str = "date";
    const TAGS: &'static [&'static str] = &[];

    fn from_tagged(date: &JsonValue, mut fields: JsonMap) -> Result<Self, VariantError> {
        match date.as_i64() {
            Some(0) => variant::decode_fields::<Self, _>("inaccessible", fields)
                .map(MaybeInaccessibleMessage::Inaccessible),
            Some(_) => {
                // the date is a regular field of accessible messages
                fields.insert(Self::DISCRIMINATOR.to_owned(), date.clone());
                variant::decode_fields::<Self, _>("message", fields)
                    .map(MaybeInaccessibleMessage::Message)
            },
            None => InvalidDiscriminatorSnafu {
                open_type: Self::NAME,
                field: Self::DISCRIMINATOR,
                value: Box::new(date.clone()),
            }.fail(),
        }
    }

    fn discriminator(&self) -> JsonValue {
        match self {
            MaybeInaccessibleMessage::Message(m) => JsonValue::from(m.date.to_unix().unwrap_or_default()),
            MaybeInaccessibleMessage::Inaccessible(_) => JsonValue::from(0),
        }
    }
}

#[derive(Serialize)]
struct InaccessibleWire<'a> {
    chat: &'a Chat,
    message_id: i64,
    date: i64,
}

impl Serialize for MaybeInaccessibleMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MaybeInaccessibleMessage::Message(m) if m.date.is_unset() => {
                Err(ser::Error::custom(VariantError::Unencodable {
                    open_type: Self::NAME.to_owned(),
                    reason: "an accessible message needs a date, a date of 0 marks inaccessible messages".to_owned(),
                }))
            },
            MaybeInaccessibleMessage::Message(m) => m.serialize(serializer),
            MaybeInaccessibleMessage::Inaccessible(m) => InaccessibleWire {
                chat: &m.chat,
                message_id: m.message_id,
                date: 0,
            }.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MaybeInaccessibleMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        variant::deserialize(deserializer)
    }
}
