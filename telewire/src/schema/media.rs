use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::{wire_enum, InputFile, OpenType, ParseMode};


#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Use `https://api.telegram.org/file/bot<token>/<file_path>` to download the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}


// -----------------------------------------------------------------------------
//     Stickers
// -----------------------------------------------------------------------------

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StickerType {
    #[default]
    Unknown,
    Regular,
    Mask,
    CustomEmoji,
}

wire_enum!(StickerType, unknown_write = Fail);

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StickerFormat {
    #[default]
    Unknown,
    Static,
    Animated,
    Video,
}

wire_enum!(StickerFormat, unknown_write = Fail);

#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, Default, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MaskPoint {
    #[default]
    Unknown,
    Forehead,
    Eyes,
    Mouth,
    Chin,
}

wire_enum!(MaskPoint, unknown_write = Fail);

/// Where a mask is placed on faces, shifts are in widths/heights of the mask.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MaskPosition {
    pub point: MaskPoint,
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(rename = "type")]
    pub kind: StickerType,
    pub width: u32,
    pub height: u32,
    pub is_animated: bool,
    pub is_video: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_position: Option<MaskPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A sticker to add to a sticker set.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSticker {
    pub sticker: InputFile,
    pub format: StickerFormat,
    pub emoji_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_position: Option<MaskPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}


// -----------------------------------------------------------------------------
//     Input media
// -----------------------------------------------------------------------------

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputMediaPhoto {
    pub media: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_spoiler: Option<bool>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputMediaVideo {
    pub media: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<InputFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_streaming: Option<bool>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputMediaAnimation {
    pub media: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<InputFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputMediaAudio {
    pub media: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<InputFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputMediaDocument {
    pub media: InputFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<InputFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_content_type_detection: Option<bool>,
}

/// Content of a media message to send.
#[derive(PartialEq, Debug, Clone, Serialize, OpenType)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputMedia {
    Photo(InputMediaPhoto),
    Video(InputMediaVideo),
    Animation(InputMediaAnimation),
    Audio(InputMediaAudio),
    Document(InputMediaDocument),
}

impl InputMedia {
    pub fn photo(media: InputFile) -> Self {
        InputMedia::Photo(InputMediaPhoto { media, caption: None, parse_mode: None, has_spoiler: None })
    }

    pub fn document(media: InputFile) -> Self {
        InputMedia::Document(InputMediaDocument {
            media,
            thumbnail: None,
            caption: None,
            disable_content_type_detection: None,
        })
    }

    pub fn media(&self) -> &InputFile {
        match self {
            InputMedia::Photo(m) => &m.media,
            InputMedia::Video(m) => &m.media,
            InputMedia::Animation(m) => &m.media,
            InputMedia::Audio(m) => &m.media,
            InputMedia::Document(m) => &m.media,
        }
    }
}
