use std::collections::HashSet;
use std::fmt::Debug;

use chrono::{TimeZone, Utc};
use color_eyre::eyre::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use telewire::{
    variant, BackgroundFill, BackgroundFillFreeformGradient, BackgroundFillGradient,
    BackgroundFillSolid, BotCommandScope, BotCommandScopeChat, BotCommandScopeChatAdministrators,
    BotCommandScopeChatMember, Chat, ChatBoostSource, ChatBoostSourceGiftCode,
    ChatBoostSourceGiveaway, ChatBoostSourcePremium, ChatId, ChatMember, ChatMemberAdministrator,
    ChatMemberBanned, ChatMemberLeft, ChatMemberMember, ChatMemberOwner, ChatMemberRestricted,
    ChatAction, ChatType, Color, DiceEmoji, InaccessibleMessage, InputFile, InputMedia, InputMediaAnimation,
    InputMediaAudio, InputMediaDocument, InputMediaPhoto, InputMediaVideo, JsonValue,
    MaskPoint, MaybeInaccessibleMessage, Message, MessageEntityType, MessageOrigin,
    MessageOriginChannel, MessageOriginChat, MessageOriginHiddenUser, MessageOriginUser, OpenType,
    ParseMode, PollType, ReactionType, ReactionTypeCustomEmoji, StickerFormat, StickerType,
    Timestamp, Update, UpdateType, User, VariantError, WireEnum,
};


// -----------------------------------------------------------------------------
//     Utility test functions
// -----------------------------------------------------------------------------

fn user(id: i64) -> User {
    User {
        id,
        is_bot: false,
        first_name: "Alice".to_owned(),
        last_name: None,
        username: Some("alice".to_owned()),
        language_code: Some("en".to_owned()),
        is_premium: None,
    }
}

fn group() -> Chat {
    Chat {
        id: -1001234567890,
        kind: ChatType::Supergroup,
        title: Some("Rustaceans".to_owned()),
        username: None,
        first_name: None,
        last_name: None,
        is_forum: Some(true),
    }
}

fn date() -> Timestamp {
    Timestamp::from_unix(1700000000).unwrap()
}

/// Check that `obj` survives a round trip and that its wire form has the right tag at top level.
#[track_caller]
fn check_round_trip<T>(obj: T, tag: &str)
where
    T: OpenType + Serialize + DeserializeOwned + Debug + PartialEq,
{
    let wire = serde_json::to_value(&obj).unwrap();
    assert_eq!(wire[T::DISCRIMINATOR], json!(tag),
               "wrong discriminator in {wire} for: {obj:?}");
    assert_eq!(obj.discriminator(), json!(tag));
    assert!(T::TAGS.contains(&tag), "{tag} is not registered in {}", T::NAME);

    let decoded: T = serde_json::from_value(wire).unwrap();
    assert_eq!(decoded, obj,
               "deserialized object `{:?}` is not the same as original one `{:?}`",
               decoded, obj);
}

#[track_caller]
fn check_tags<T: OpenType>(expected: &[&str]) {
    assert_eq!(T::TAGS, expected);
    let unique: HashSet<_> = T::TAGS.iter().collect();
    assert_eq!(unique.len(), T::TAGS.len(), "duplicate tags in {}", T::NAME);
}


// -----------------------------------------------------------------------------
//     Open types
// -----------------------------------------------------------------------------

#[test]
fn registries() {
    check_tags::<MessageOrigin>(&["user", "hidden_user", "chat", "channel"]);
    check_tags::<ChatMember>(&["creator", "administrator", "member", "restricted", "left", "kicked"]);
    check_tags::<ChatBoostSource>(&["premium", "gift_code", "giveaway"]);
    check_tags::<ReactionType>(&["emoji", "custom_emoji", "paid"]);
    check_tags::<BackgroundFill>(&["solid", "gradient", "freeform_gradient"]);
    check_tags::<BotCommandScope>(&["default", "all_private_chats", "all_group_chats",
                                    "all_chat_administrators", "chat", "chat_administrators",
                                    "chat_member"]);
    check_tags::<InputMedia>(&["photo", "video", "animation", "audio", "document"]);

    assert_eq!(MessageOrigin::DISCRIMINATOR, "type");
    assert_eq!(ChatMember::DISCRIMINATOR, "status");
    assert_eq!(ChatBoostSource::DISCRIMINATOR, "source");
    assert_eq!(MaybeInaccessibleMessage::DISCRIMINATOR, "date");
}

#[test]
fn message_origin() {
    check_round_trip(MessageOrigin::User(MessageOriginUser { date: date(), sender_user: user(1) }), "user");
    check_round_trip(MessageOrigin::HiddenUser(MessageOriginHiddenUser {
        date: date(),
        sender_user_name: "Anonymous".to_owned(),
    }), "hidden_user");
    check_round_trip(MessageOrigin::Chat(MessageOriginChat {
        date: date(),
        sender_chat: group(),
        author_signature: Some("admin".to_owned()),
    }), "chat");
    check_round_trip(MessageOrigin::Channel(MessageOriginChannel {
        date: date(),
        chat: group(),
        message_id: 77,
        author_signature: None,
    }), "channel");
}

#[test]
fn chat_member() {
    let until = Utc.timestamp_opt(1700000000, 0).unwrap();

    check_round_trip(ChatMember::Owner(ChatMemberOwner {
        user: user(1),
        is_anonymous: false,
        custom_title: Some("boss".to_owned()),
    }), "creator");
    check_round_trip(ChatMember::Administrator(ChatMemberAdministrator {
        user: user(2),
        can_be_edited: true,
        is_anonymous: false,
        can_manage_chat: true,
        can_delete_messages: true,
        can_restrict_members: false,
        can_promote_members: false,
        can_change_info: true,
        can_invite_users: true,
        custom_title: None,
    }), "administrator");
    check_round_trip(ChatMember::Member(ChatMemberMember { user: user(3), until_date: None }), "member");
    check_round_trip(ChatMember::Restricted(ChatMemberRestricted {
        user: user(4),
        is_member: true,
        can_send_messages: false,
        can_send_photos: false,
        can_add_web_page_previews: false,
        until_date: Some(until),
    }), "restricted");
    check_round_trip(ChatMember::Left(ChatMemberLeft { user: user(5) }), "left");
    check_round_trip(ChatMember::Banned(ChatMemberBanned { user: user(6), until_date: Some(until) }), "kicked");
    check_round_trip(ChatMember::Banned(ChatMemberBanned { user: user(6), until_date: None }), "kicked");
}

#[test]
fn banned_forever() -> Result<()> {
    let member: ChatMember = serde_json::from_value(json!({
        "user": {"id": 6, "is_bot": false, "first_name": "Mallory"},
        "until_date": 0,
        "status": "kicked",
    }))?;
    let ChatMember::Banned(banned) = &member else { panic!("not a banned member: {member:?}") };
    assert_eq!(banned.until_date, None);
    assert_eq!(member.user().first_name, "Mallory");

    assert_eq!(serde_json::to_value(&member)?["until_date"], json!(0));
    Ok(())
}

#[test]
fn chat_boost_source() {
    check_round_trip(ChatBoostSource::Premium(ChatBoostSourcePremium { user: user(1) }), "premium");
    check_round_trip(ChatBoostSource::GiftCode(ChatBoostSourceGiftCode { user: user(1) }), "gift_code");
    check_round_trip(ChatBoostSource::Giveaway(ChatBoostSourceGiveaway {
        giveaway_message_id: 12,
        user: None,
        is_unclaimed: Some(true),
    }), "giveaway");
}

#[test]
fn reaction_type() -> Result<()> {
    check_round_trip(ReactionType::emoji("👍"), "emoji");
    check_round_trip(ReactionType::CustomEmoji(ReactionTypeCustomEmoji {
        custom_emoji_id: "5368324170671202286".to_owned(),
    }), "custom_emoji");
    check_round_trip(ReactionType::Paid, "paid");

    assert_eq!(serde_json::to_value(ReactionType::Paid)?, json!({"type": "paid"}));
    Ok(())
}

#[test]
fn background_fill() -> Result<()> {
    check_round_trip(BackgroundFill::Solid(BackgroundFillSolid { color: Color(0x6FB9F0) }), "solid");
    check_round_trip(BackgroundFill::Gradient(BackgroundFillGradient {
        top_color: Color(0xFFFFFF),
        bottom_color: Color(0),
        rotation_angle: 45,
    }), "gradient");
    check_round_trip(BackgroundFill::FreeformGradient(BackgroundFillFreeformGradient {
        colors: vec![Color(1), Color(2), Color(3)],
    }), "freeform_gradient");

    let fill = serde_json::to_value(BackgroundFill::Solid(BackgroundFillSolid { color: Color(0x6FB9F0) }))?;
    assert_eq!(fill, json!({"type": "solid", "color": 7322096}));
    Ok(())
}

#[test]
fn bot_command_scope() {
    check_round_trip(BotCommandScope::Default, "default");
    check_round_trip(BotCommandScope::AllPrivateChats, "all_private_chats");
    check_round_trip(BotCommandScope::AllGroupChats, "all_group_chats");
    check_round_trip(BotCommandScope::AllChatAdministrators, "all_chat_administrators");
    check_round_trip(BotCommandScope::Chat(BotCommandScopeChat {
        chat_id: ChatId::Username("@rustlang".to_owned()),
    }), "chat");
    check_round_trip(BotCommandScope::ChatAdministrators(BotCommandScopeChatAdministrators {
        chat_id: ChatId::Id(-1001234567890),
    }), "chat_administrators");
    check_round_trip(BotCommandScope::ChatMember(BotCommandScopeChatMember {
        chat_id: ChatId::Id(-1001234567890),
        user_id: 42,
    }), "chat_member");
}

#[test]
fn input_media() {
    let photo = InputFile::id("AgACAgIAAxkBAAIB");
    let url = InputFile::url("https://example.com/video.mp4");

    check_round_trip(InputMedia::Photo(InputMediaPhoto {
        media: photo.clone(),
        caption: Some("<b>cat</b>".to_owned()),
        parse_mode: Some(ParseMode::Html),
        has_spoiler: None,
    }), "photo");
    check_round_trip(InputMedia::Video(InputMediaVideo {
        media: url.clone(),
        thumbnail: Some(photo.clone()),
        caption: None,
        width: Some(640),
        height: Some(480),
        duration: Some(12),
        supports_streaming: Some(true),
    }), "video");
    check_round_trip(InputMedia::Animation(InputMediaAnimation {
        media: url.clone(),
        thumbnail: None,
        caption: None,
        width: None,
        height: None,
        duration: Some(3),
    }), "animation");
    check_round_trip(InputMedia::Audio(InputMediaAudio {
        media: photo.clone(),
        thumbnail: None,
        caption: None,
        duration: Some(180),
        performer: Some("Ferris".to_owned()),
        title: None,
    }), "audio");
    check_round_trip(InputMedia::document(url), "document");
}

#[test]
fn discriminator_position_does_not_matter() -> Result<()> {
    let first: MessageOrigin = serde_json::from_value(json!({
        "type": "hidden_user", "date": 1700000000, "sender_user_name": "X",
    }))?;
    let last: MessageOrigin = serde_json::from_str(
        r#"{"date": 1700000000, "sender_user_name": "X", "type": "hidden_user"}"#)?;
    assert_eq!(first, last);
    Ok(())
}

#[test]
fn unknown_discriminator() {
    let value = json!({"type": "not_a_real_type", "date": 1700000000});

    let err = serde_json::from_value::<MessageOrigin>(value.clone()).unwrap_err();
    assert!(err.to_string().contains(r#""not_a_real_type""#), "{err}");
    assert!(err.to_string().contains("MessageOrigin"), "{err}");

    match variant::decode::<MessageOrigin>(value) {
        Err(VariantError::UnknownDiscriminator { open_type, tag }) => {
            assert_eq!(open_type, "MessageOrigin");
            assert_eq!(tag, "not_a_real_type");
        },
        other => panic!("expected an unknown discriminator error, got: {other:?}"),
    }
}

#[test]
fn decode_failures() {
    let no_tag = json!({"user": {"id": 1, "is_bot": false, "first_name": "A"}});
    assert!(matches!(variant::decode::<ChatMember>(no_tag.clone()),
                     Err(VariantError::MissingDiscriminator { .. })));
    assert!(matches!(variant::decode::<ChatMember>(json!([1, 2])),
                     Err(VariantError::Malformed { .. })));
    assert!(matches!(variant::decode::<ReactionType>(json!({"type": 3})),
                     Err(VariantError::InvalidDiscriminator { .. })));
    assert!(matches!(variant::decode::<MessageOrigin>(json!({"type": "hidden_user"})),
                     Err(VariantError::Body { ref tag, .. }) if tag == "hidden_user"));
    assert!(matches!(variant::decode::<MaybeInaccessibleMessage>(json!({"date": "yesterday"})),
                     Err(VariantError::InvalidDiscriminator { .. })));

    assert!(serde_json::from_str::<ChatMember>("{not json").is_err());
}

#[test]
fn nullable_context() -> Result<()> {
    let no_tag = json!({"user": {"id": 1, "is_bot": false, "first_name": "A"}});
    assert_eq!(variant::decode_optional::<ChatMember>(no_tag)?, None);
    assert_eq!(variant::decode_optional::<ChatMember>(JsonValue::Null)?, None);
    assert!(variant::decode_optional::<ChatMember>(json!({"status": "owner"})).is_err());

    let message: Message = serde_json::from_value(json!({
        "message_id": 1,
        "date": 1700000000,
        "chat": {"id": 1, "type": "private", "first_name": "A"},
        "forward_origin": {"date": 1700000000},
    }))?;
    assert_eq!(message.forward_origin, None);
    Ok(())
}

#[test]
fn maybe_inaccessible_message() -> Result<()> {
    let message = Message::text(10, date(), group(), "hello");
    let wire = serde_json::to_value(MaybeInaccessibleMessage::Message(message.clone()))?;
    assert_eq!(wire["date"], json!(1700000000));
    assert_eq!(serde_json::from_value::<MaybeInaccessibleMessage>(wire)?,
               MaybeInaccessibleMessage::Message(message.clone()));

    let gone = MaybeInaccessibleMessage::Inaccessible(InaccessibleMessage { chat: group(), message_id: 11 });
    let wire = serde_json::to_value(&gone)?;
    assert_eq!(wire["date"], json!(0));
    assert_eq!(wire["message_id"], json!(11));
    assert_eq!(serde_json::from_value::<MaybeInaccessibleMessage>(wire)?, gone);
    assert_eq!(gone.discriminator(), json!(0));

    // a date of 0 would turn it into an inaccessible message
    let undated = MaybeInaccessibleMessage::Message(Message::text(12, Timestamp::Unset, group(), "?"));
    let err = serde_json::to_value(&undated).unwrap_err();
    assert!(err.to_string().contains("cannot encode MaybeInaccessibleMessage"), "{err}");
    Ok(())
}


// -----------------------------------------------------------------------------
//     Enums
// -----------------------------------------------------------------------------

#[test]
fn enum_tokens() -> Result<()> {
    assert_eq!(ChatType::tokens(), &["private", "group", "supergroup", "channel"]);
    assert_eq!(ParseMode::tokens(), &["Markdown", "MarkdownV2", "HTML"]);
    assert_eq!(DiceEmoji::from_token("🎰"), DiceEmoji::SlotMachine);
    assert_eq!(serde_json::to_value(DiceEmoji::Darts)?, json!("🎯"));
    assert_eq!(MessageEntityType::BotCommand.to_token()?, "bot_command");
    assert_eq!(UpdateType::tokens()[0], "unknown");
    Ok(())
}

#[track_caller]
fn check_unique_tokens<E: WireEnum>() {
    let unique: HashSet<_> = E::tokens().iter().collect();
    assert_eq!(unique.len(), E::tokens().len(), "duplicate tokens in {}: {:?}", E::NAME, E::tokens());
}

#[test]
fn wire_tokens_are_unique() {
    check_unique_tokens::<ChatType>();
    check_unique_tokens::<ChatAction>();
    check_unique_tokens::<MessageEntityType>();
    check_unique_tokens::<UpdateType>();
    check_unique_tokens::<ParseMode>();
    check_unique_tokens::<DiceEmoji>();
    check_unique_tokens::<PollType>();
    check_unique_tokens::<StickerType>();
    check_unique_tokens::<StickerFormat>();
    check_unique_tokens::<MaskPoint>();
}

#[test]
fn unknown_tokens_read_as_zero_constant() -> Result<()> {
    assert_eq!(ChatType::from_token("secret"), ChatType::Unknown);
    assert_eq!(serde_json::from_value::<MessageEntityType>(json!("date_time"))?, MessageEntityType::Unknown);
    assert_eq!(serde_json::from_value::<UpdateType>(json!("business_message"))?, UpdateType::Unknown);
    assert_eq!(serde_json::from_value::<ParseMode>(json!("markdown"))?, ParseMode::Unknown);
    Ok(())
}

#[test]
fn unknown_write_policies() -> Result<()> {
    // fail
    let err = ChatType::Unknown.to_token().unwrap_err();
    assert_eq!(err.to_string(), "cannot encode ChatType::Unknown: constant has no wire token");
    assert!(serde_json::to_value(ParseMode::Unknown).is_err());

    // emit "unknown"
    assert_eq!(serde_json::to_value(MessageEntityType::Unknown)?, json!("unknown"));
    assert_eq!(serde_json::to_value(UpdateType::Unknown)?, json!("unknown"));
    Ok(())
}


// -----------------------------------------------------------------------------
//     Scalars
// -----------------------------------------------------------------------------

#[test]
fn timestamps() -> Result<()> {
    assert_eq!(serde_json::to_value(Timestamp::Unset)?, json!(0));
    assert_eq!(serde_json::from_value::<Timestamp>(json!(0))?, Timestamp::Unset);
    assert!(serde_json::from_value::<Timestamp>(json!(-1)).is_err());
    assert_eq!(serde_json::from_value::<Timestamp>(json!(1700000000))?.datetime(),
               Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()));
    Ok(())
}

#[test]
fn chat_ids() -> Result<()> {
    let alice = ChatId::Username("alice".to_owned());
    assert_eq!(serde_json::to_value(&alice)?, json!("alice"));
    assert_eq!(serde_json::from_value::<ChatId>(json!("alice"))?, alice);

    let id = ChatId::Id(12345);
    assert_eq!(serde_json::to_value(&id)?, json!("12345"));
    assert_eq!(serde_json::from_value::<ChatId>(json!("12345"))?, id);
    Ok(())
}


// -----------------------------------------------------------------------------
//     Updates
// -----------------------------------------------------------------------------

#[test]
fn decode_message_update() -> Result<()> {
    let update: Update = serde_json::from_value(json!({
        "update_id": 900001,
        "message": {
            "message_id": 42,
            "from": {"id": 7, "is_bot": false, "first_name": "Bob", "is_premium": true},
            "chat": {"id": -1001234567890i64, "type": "supergroup", "title": "Rustaceans", "is_forum": true},
            "date": 1700000000,
            "text": "/start@bot and some 🦀 news",
            "entities": [
                {"type": "bot_command", "offset": 0, "length": 10},
                {"type": "some_future_entity", "offset": 11, "length": 3},
            ],
            "forward_origin": {"type": "channel", "date": 1699990000, "message_id": 3,
                               "chat": {"id": -1009, "type": "channel", "title": "News"}},
            "pinned_message": {"chat": {"id": -1001234567890i64, "type": "supergroup"},
                               "message_id": 41, "date": 0},
            "dice": {"emoji": "🎲", "value": 6},
        },
    }))?;

    assert_eq!(update.kind(), UpdateType::Message);
    let message = update.message.as_ref().unwrap();
    assert_eq!(message.chat.kind, ChatType::Supergroup);
    assert_eq!(message.date, date());

    let entities = message.entities.as_ref().unwrap();
    assert_eq!(entities[0].kind, MessageEntityType::BotCommand);
    assert_eq!(entities[1].kind, MessageEntityType::Unknown);

    assert!(matches!(message.forward_origin, Some(MessageOrigin::Channel(ref o)) if o.message_id == 3));
    assert!(matches!(message.pinned_message.as_deref(), Some(MaybeInaccessibleMessage::Inaccessible(_))));
    assert_eq!(message.dice.as_ref().unwrap().emoji, DiceEmoji::Dice);

    // entities with unknown types are written back as "unknown"
    let wire = serde_json::to_value(&update)?;
    assert_eq!(wire["message"]["entities"][1]["type"], json!("unknown"));
    assert_eq!(wire["message"]["pinned_message"]["date"], json!(0));
    Ok(())
}

#[test]
fn decode_chat_member_update() -> Result<()> {
    let update: Update = serde_json::from_value(json!({
        "update_id": 900002,
        "chat_member": {
            "chat": {"id": -100, "type": "group", "title": "G"},
            "from": {"id": 1, "is_bot": false, "first_name": "Admin"},
            "date": 1700000000,
            "old_chat_member": {"status": "member", "user": {"id": 2, "is_bot": false, "first_name": "U"}},
            "new_chat_member": {"status": "restricted", "user": {"id": 2, "is_bot": false, "first_name": "U"},
                                "is_member": true, "can_send_messages": false, "can_send_photos": false,
                                "can_add_web_page_previews": false, "until_date": 1700086400},
        },
    }))?;

    assert_eq!(update.kind(), UpdateType::ChatMember);
    let change = update.chat_member.unwrap();
    assert!(matches!(change.old_chat_member, ChatMember::Member(ChatMemberMember { until_date: None, .. })));
    let ChatMember::Restricted(restricted) = change.new_chat_member else { panic!("not restricted") };
    assert_eq!(restricted.until_date, Some(Utc.timestamp_opt(1700086400, 0).unwrap()));
    Ok(())
}

#[test]
fn unknown_update() -> Result<()> {
    let update: Update = serde_json::from_value(json!({
        "update_id": 900003,
        "business_connection": {"id": "abc"},
    }))?;
    assert_eq!(update.kind(), UpdateType::Unknown);
    Ok(())
}
