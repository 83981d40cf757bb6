//!
//! Decoding of open types: families of records sharing a shape, told apart on
//! the wire by a discriminator field.
//!
//! Each open type is a Rust enum with one variant per concrete record. The
//! encoding side is serde's internally tagged representation
//! (`#[serde(tag = "...")]`): the discriminator is written first, followed by
//! the fields of the record, all through the same `Serializer` so that nested
//! values keep flowing through it. The decoding side is generated by
//! [`#[derive(OpenType)]`](macro@crate::OpenType) and goes through the helpers
//! in this module:
//!
//!  1. the whole object is read into a `JsonValue`, as the discriminator may
//!     come after the fields it disambiguates
//!  2. the discriminator is removed from the object
//!  3. the matching record is decoded from the remaining fields
//!
//! ## Example
//! ```
//! # use telewire::{json, MessageOrigin};
//! let origin: MessageOrigin = serde_json::from_value(json!({
//!     "date": 1700000000,
//!     "sender_user_name": "anonymous",
//!     "type": "hidden_user",
//! }))?;
//! assert!(matches!(origin, MessageOrigin::HiddenUser(_)));
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::trace;

use crate::{JsonError, JsonMap, JsonValue};


#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VariantError {
    #[snafu(display("cannot decode {open_type}: expected a JSON object, got: {value}"))]
    Malformed { open_type: String, value: Box<JsonValue> },

    #[snafu(display(r#"cannot decode {open_type}: missing discriminator field "{field}""#))]
    MissingDiscriminator { open_type: String, field: String },

    #[snafu(display(r#"cannot decode {open_type}: invalid value for discriminator "{field}": {value}"#))]
    InvalidDiscriminator { open_type: String, field: String, value: Box<JsonValue> },

    #[snafu(display(r#"unknown discriminator "{tag}" for open type {open_type}"#))]
    UnknownDiscriminator { open_type: String, tag: String },

    #[snafu(display(r#"cannot decode variant "{tag}" of {open_type}: {source}"#))]
    Body { open_type: String, tag: String, source: JsonError },

    #[snafu(display("cannot encode {open_type}: {reason}"))]
    Unencodable { open_type: String, reason: String },
}

/// A closed set of records sharing a shape, selected by a discriminator field.
///
/// Use `#[derive(OpenType)]` to implement this for an enum.
pub trait OpenType: Sized {
    /// Name of the open type, used in error messages.
    const NAME: &'static str;

    /// Name of the wire field holding the discriminator.
    const DISCRIMINATOR: &'static str;

    /// All the tags of the registry, empty if the discriminator is not a tag.
    const TAGS: &'static [&'static str];

    /// Build the variant selected by the discriminator `tag` from the remaining `fields`.
    fn from_tagged(tag: &JsonValue, fields: JsonMap) -> Result<Self, VariantError>;

    /// Discriminator value written for this instance.
    fn discriminator(&self) -> JsonValue;
}


// -----------------------------------------------------------------------------
//     Decoding
// -----------------------------------------------------------------------------

/// Decode an open type from a JSON value, failing if the discriminator is missing.
pub fn decode<T: OpenType>(value: JsonValue) -> Result<T, VariantError> {
    let JsonValue::Object(mut fields) = value else {
        return MalformedSnafu { open_type: T::NAME, value: Box::new(value) }.fail();
    };

    let tag = fields.remove(T::DISCRIMINATOR)
        .context(MissingDiscriminatorSnafu { open_type: T::NAME, field: T::DISCRIMINATOR })?;

    trace!(open_type = T::NAME, %tag, "decoding variant");
    T::from_tagged(&tag, fields)
}

/// Decode an open type where absence is acceptable: `null` and objects without
/// a discriminator both decode to `None`.
pub fn decode_optional<T: OpenType>(value: JsonValue) -> Result<Option<T>, VariantError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Object(ref fields) if !fields.contains_key(T::DISCRIMINATOR) => {
            trace!(open_type = T::NAME, "no discriminator in nullable context, decoding as None");
            Ok(None)
        },
        value => decode(value).map(Some),
    }
}

/// Encode an open type as a JSON value.
pub fn encode<T: OpenType + Serialize>(value: &T) -> Result<JsonValue, JsonError> {
    serde_json::to_value(value)
}

/// Return the discriminator as a string tag.
pub fn tag_str<T: OpenType>(tag: &JsonValue) -> Result<&str, VariantError> {
    tag.as_str().with_context(|| InvalidDiscriminatorSnafu {
        open_type: T::NAME,
        field: T::DISCRIMINATOR,
        value: Box::new(tag.clone()),
    })
}

pub fn unknown_tag<T: OpenType>(tag: &str) -> Result<T, VariantError> {
    UnknownDiscriminatorSnafu { open_type: T::NAME, tag }.fail()
}

/// Decode the record of variant `tag` of `T` from the fields left once the
/// discriminator has been removed.
pub fn decode_fields<T, V>(tag: &str, fields: JsonMap) -> Result<V, VariantError>
where
    T: OpenType,
    V: DeserializeOwned,
{
    serde_json::from_value(JsonValue::Object(fields))
        .context(BodySnafu { open_type: T::NAME, tag })
}

/// `Deserialize` implementation for open types.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: OpenType,
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    decode(value).map_err(de::Error::custom)
}


// -----------------------------------------------------------------------------
//     Nullable context
// -----------------------------------------------------------------------------

/// `serde` codec for optional open type fields: a value without discriminator
/// decodes to `None` instead of failing.
///
/// Use it with `#[serde(default, with = "telewire::variant::nullable")]`.
pub mod nullable {
    use super::*;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: OpenType,
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        decode_optional(value).map_err(de::Error::custom)
    }
}
