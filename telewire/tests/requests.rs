use chrono::{TimeZone, Utc};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use telewire::{
    attach::{to_wire, AttachmentSink},
    request::{
        decode_response, encode_request, AddStickerToSet, ApiError, BanChatMember, BotRequest,
        GetUpdates, RequestBody, SendMediaGroup, SendMessage, SendPhoto, SetMyCommands,
    },
    BotCommand, BotCommandScope, BotCommandScopeChat, ChatId, InputFile, InputMedia,
    InputSticker, JsonValue, Message, StickerFormat, UpdateType, WireError,
};


// -----------------------------------------------------------------------------
//     Utility test functions
// -----------------------------------------------------------------------------

#[derive(Serialize)]
struct ThreeFiles {
    first: InputFile,
    second: InputFile,
    third: InputFile,
}

impl BotRequest for ThreeFiles {
    type Response = bool;
    const METHOD: &'static str = "threeFiles";
}

#[derive(Serialize)]
struct NotAnObject(Vec<i32>);

impl BotRequest for NotAnObject {
    type Response = bool;
    const METHOD: &'static str = "notAnObject";
}

/// Result type without a `Default` implementation.
#[derive(Debug, PartialEq, Deserialize)]
struct Echo {
    text: String,
}

#[track_caller]
fn json_body<R: BotRequest>(request: &R) -> JsonValue {
    match encode_request(request).unwrap() {
        RequestBody::Json(bytes) => serde_json::from_slice(&bytes).unwrap(),
        RequestBody::Multipart(form) => panic!("expected a JSON body, got: {form:?}"),
    }
}

/// Media group with `uploads` uploaded photos, followed by a photo given by URL.
fn media_group(uploads: usize, prefix: &str) -> SendMediaGroup {
    let mut media: Vec<_> = (0..uploads)
        .map(|i| InputMedia::photo(InputFile::upload(format!("{prefix}-{i}.jpg"),
                                                     format!("{prefix}:{i}").into_bytes())))
        .collect();
    media.push(InputMedia::photo(InputFile::url("https://example.com/last.jpg")));

    SendMediaGroup { chat_id: ChatId::Id(42), media, disable_notification: None }
}


// -----------------------------------------------------------------------------
//     Attachments
// -----------------------------------------------------------------------------

#[test]
fn uploads_are_numbered_in_order() -> Result<()> {
    let request = ThreeFiles {
        first: InputFile::upload("f1.txt", b"F1".to_vec()),
        second: InputFile::upload("f2.txt", b"F2".to_vec()),
        third: InputFile::upload("f3.txt", b"F3".to_vec()),
    };

    let mut sink = AttachmentSink::new();
    let wire = to_wire(&request, &mut sink)?;
    assert_eq!(wire, json!({"first": "attach://0", "second": "attach://1", "third": "attach://2"}));

    let data: Vec<&[u8]> = sink.attachments().iter().map(|a| a.data()).collect();
    assert_eq!(data, vec![b"F1".as_slice(), b"F2".as_slice(), b"F3".as_slice()]);
    for (i, a) in sink.attachments().iter().enumerate() {
        assert_eq!(a.index(), i);
        assert_eq!(a.token(), format!("attach://{i}"));
    }
    Ok(())
}

#[test]
fn ids_and_urls_are_not_uploads() -> Result<()> {
    let request = ThreeFiles {
        first: InputFile::id("AgACAgIAAxkBAAIB"),
        second: InputFile::url("https://example.com/cat.jpg"),
        third: InputFile::upload("f.bin", vec![0u8, 1, 2]),
    };

    let mut sink = AttachmentSink::new();
    let wire = to_wire(&request, &mut sink)?;
    assert_eq!(wire["first"], json!("AgACAgIAAxkBAAIB"));
    assert_eq!(wire["second"], json!("https://example.com/cat.jpg"));
    assert_eq!(wire["third"], json!("attach://0"));
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[test]
fn pending_file_references_are_rejected() {
    let request = SendPhoto::new(ChatId::Id(42), InputFile::from_token("attach://3"));
    let err = encode_request(&request).unwrap_err();
    assert!(err.to_string().contains("unsupported file reference"), "{err}");
}

#[test]
fn concurrent_passes_are_independent() {
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|t| s.spawn(move || {
                let prefix = format!("thread{t}");
                let request = media_group(t + 1, &prefix);
                (t, prefix, encode_request(&request).unwrap())
            }))
            .collect();

        for handle in handles {
            let (t, prefix, body) = handle.join().unwrap();
            let RequestBody::Multipart(form) = body else { panic!("expected a multipart body") };

            assert_eq!(form.attachments().len(), t + 1);
            for (i, a) in form.attachments().iter().enumerate() {
                assert_eq!(a.index(), i);
                assert_eq!(a.data(), format!("{prefix}:{i}").as_bytes());
            }

            let media: JsonValue = serde_json::from_str(form.field("media").unwrap()).unwrap();
            for i in 0..=t {
                assert_eq!(media[i]["media"], json!(format!("attach://{i}")));
            }
            assert_eq!(media[t + 1]["media"], json!("https://example.com/last.jpg"));
        }
    });
}


// -----------------------------------------------------------------------------
//     Request bodies
// -----------------------------------------------------------------------------

#[test]
fn requests_without_uploads_are_json() {
    let body = json_body(&SendMessage::new(ChatId::Id(42), "hello"));
    assert_eq!(body, json!({"chat_id": "42", "text": "hello"}));

    let body = json_body(&SendPhoto::new(ChatId::Username("@rustlang".to_owned()),
                                         InputFile::id("AgACAgIAAxkBAAIB")));
    assert_eq!(body, json!({"chat_id": "@rustlang", "photo": "AgACAgIAAxkBAAIB"}));

    let body = json_body(&GetUpdates {
        offset: Some(900001),
        allowed_updates: Some(vec![UpdateType::Message, UpdateType::ChatMember]),
        ..Default::default()
    });
    assert_eq!(body, json!({"offset": 900001, "allowed_updates": ["message", "chat_member"]}));

    let body = json_body(&SetMyCommands {
        commands: vec![BotCommand::new("start", "Start the bot")],
        scope: Some(BotCommandScope::Chat(BotCommandScopeChat { chat_id: ChatId::Id(-100) })),
        language_code: None,
    });
    assert_eq!(body["scope"], json!({"type": "chat", "chat_id": "-100"}));
}

#[test]
fn ban_time_in_requests() {
    let forever = BanChatMember { chat_id: ChatId::Id(-100), user_id: 7, until_date: None, revoke_messages: None };
    assert_eq!(json_body(&forever)["until_date"], json!(0));

    let until = Utc.timestamp_opt(1700000000, 0).unwrap();
    let limited = BanChatMember { until_date: Some(until), ..forever };
    assert_eq!(json_body(&limited)["until_date"], json!(1700000000));
}

#[test]
fn requests_with_uploads_are_multipart() -> Result<()> {
    let mut request = SendPhoto::new(ChatId::Id(42), InputFile::upload("cat.jpg", b"\xff\xd8jpeg".to_vec()));
    request.caption = Some("a cat".to_owned());
    request.has_spoiler = Some(true);

    let RequestBody::Multipart(form) = encode_request(&request)? else { panic!("expected a multipart body") };
    assert_eq!(form.field("chat_id"), Some("42"));
    assert_eq!(form.field("photo"), Some("attach://0"));
    assert_eq!(form.field("caption"), Some("a cat"));
    assert_eq!(form.field("has_spoiler"), Some("true"));
    assert_eq!(form.attachments()[0].file_name(), Some("cat.jpg"));

    let (content_type, body) = RequestBody::Multipart(form).into_http();
    let boundary = content_type.strip_prefix("multipart/form-data; boundary=").unwrap();
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains(r#"Content-Disposition: form-data; name="0"; filename="cat.jpg""#));
    assert!(body.contains("Content-Type: image/jpeg"));
    assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    Ok(())
}

#[test]
fn media_group_mixes_uploads_and_urls() -> Result<()> {
    let RequestBody::Multipart(form) = encode_request(&media_group(2, "g"))? else {
        panic!("expected a multipart body")
    };

    let media: JsonValue = serde_json::from_str(form.field("media").unwrap())?;
    assert_eq!(media, json!([
        {"type": "photo", "media": "attach://0"},
        {"type": "photo", "media": "attach://1"},
        {"type": "photo", "media": "https://example.com/last.jpg"},
    ]));
    assert_eq!(form.attachments().len(), 2);
    Ok(())
}

#[test]
fn nested_uploads() -> Result<()> {
    let request = AddStickerToSet {
        user_id: 7,
        name: "ferris_by_telewire_bot".to_owned(),
        sticker: InputSticker {
            sticker: InputFile::upload("ferris.webp", b"RIFF....WEBP".to_vec()),
            format: StickerFormat::Static,
            emoji_list: vec!["🦀".to_owned()],
            mask_position: None,
            keywords: None,
        },
    };

    let RequestBody::Multipart(form) = encode_request(&request)? else { panic!("expected a multipart body") };
    let sticker: JsonValue = serde_json::from_str(form.field("sticker").unwrap())?;
    assert_eq!(sticker, json!({"sticker": "attach://0", "format": "static", "emoji_list": ["🦀"]}));
    assert_eq!(form.field("user_id"), Some("7"));
    Ok(())
}

#[test]
fn bodies_need_to_be_objects() {
    let err = encode_request(&NotAnObject(vec![1, 2])).unwrap_err();
    assert!(matches!(err, WireError::BodyNotAnObject { ref method, .. } if method == "notAnObject"));
}


// -----------------------------------------------------------------------------
//     Responses
// -----------------------------------------------------------------------------

#[test]
fn successful_response() -> Result<()> {
    let message: Message = decode_response(br#"{
        "ok": true,
        "result": {
            "message_id": 5,
            "date": 1700000000,
            "chat": {"id": 42, "type": "private", "first_name": "Alice"},
            "text": "hello"
        }
    }"#)?;
    assert_eq!(message.text.as_deref(), Some("hello"));
    assert_eq!(message.chat.chat_id(), ChatId::Id(42));
    Ok(())
}

#[test]
fn error_responses() {
    let err = decode_response::<bool>(br#"{
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: group chat was upgraded to a supergroup chat",
        "parameters": {"migrate_to_chat_id": -1001234567890}
    }"#).unwrap_err();
    match err {
        ApiError::Request { error_code, description, retry_after, migrate_to_chat_id } => {
            assert_eq!(error_code, 400);
            assert!(description.starts_with("Bad Request"));
            assert_eq!(retry_after, None);
            assert_eq!(migrate_to_chat_id, Some(-1001234567890));
        },
        other => panic!("expected a request error, got: {other:?}"),
    }

    assert!(matches!(decode_response::<bool>(br#"{"ok": true}"#), Err(ApiError::MissingResult)));
    assert!(matches!(decode_response::<Echo>(br#"{"ok": true}"#), Err(ApiError::MissingResult)));
    assert!(matches!(decode_response::<bool>(b"<html>Bad Gateway</html>"), Err(ApiError::Envelope { .. })));
    assert!(matches!(decode_response::<bool>(br#"{"ok": true, "result": "yes"}"#), Err(ApiError::Envelope { .. })));
}

#[test]
fn results_without_default() -> Result<()> {
    let echo: Echo = decode_response(br#"{"ok": true, "result": {"text": "hi"}}"#)?;
    assert_eq!(echo, Echo { text: "hi".to_owned() });

    let err = decode_response::<Echo>(br#"{"ok": false, "error_code": 403, "description": "Forbidden"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Request { error_code: 403, .. }));
    Ok(())
}
