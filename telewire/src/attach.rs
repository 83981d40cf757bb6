//!
//! Collection of file uploads during the serialization of an outbound request.
//!
//! A request is turned into JSON by a single pass of the [`WireSerializer`],
//! which carries an [`AttachmentSink`] down the whole value graph. Whenever it
//! meets a local upload (an [`InputFileStream`](crate::input_file::InputFileStream)),
//! the payload is pushed to the sink and the synthetic token `attach://{index}`
//! is written in its place. Indices follow the order in which uploads are met
//! during that depth-first pass, which is also the order of
//! [`AttachmentSink::attachments()`] and of the parts of the multipart body.
//!
//! The sink is an ordinary value owned by the caller, so every request has its
//! own and concurrent requests cannot interfere with each other.
//!
//! ## Example
//! ```
//! # use telewire::{attach::{to_wire, AttachmentSink}, json, InputFile};
//! let mut sink = AttachmentSink::new();
//! let photos = [InputFile::upload("a.jpg", b"...".to_vec()), InputFile::id("AgADBAAD")];
//! assert_eq!(to_wire(&photos, &mut sink)?, json!(["attach://0", "AgADBAAD"]));
//! assert_eq!(sink.len(), 1);
//! # Ok::<(), telewire::WireError>(())
//! ```

use std::sync::Arc;

use serde::{ser, ser::Impossible, Serialize};
use snafu::Snafu;
use tracing::trace;

use crate::{config::ATTACH_PREFIX, error::InvalidKeySnafu, JsonMap, JsonValue, WireError};


/// Name of the newtype struct wrapping upload payloads, recognized by the [`WireSerializer`].
pub(crate) const UPLOAD_MARKER: &str = "$telewire::private::Upload";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AttachError {
    #[snafu(display("unsupported file reference kind: {kind}"))]
    UnsupportedFileReference { kind: String },

    #[snafu(display(r#"cannot read upload "{name}": {source}"#))]
    Io { name: String, source: std::io::Error },

    #[snafu(display("malformed upload: {reason}"))]
    MalformedUpload { reason: String },
}


// -----------------------------------------------------------------------------
//     Attachments and sink
// -----------------------------------------------------------------------------

/// A local file collected while serializing a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    index: usize,
    file_name: Option<String>,
    data: Arc<[u8]>,
}

impl Attachment {
    pub fn index(&self) -> usize { self.index }

    /// Token written in the JSON body in place of the file.
    pub fn token(&self) -> String {
        format!("{ATTACH_PREFIX}{}", self.index)
    }

    /// Name of the multipart part carrying the file, ie: the token without its prefix.
    pub fn part_name(&self) -> String {
        self.index.to_string()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Ordered list of the attachments of one outbound request.
#[derive(Debug, Default)]
pub struct AttachmentSink {
    attachments: Vec<Attachment>,
}

impl AttachmentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attachment and return the token standing for it.
    pub fn push(&mut self, file_name: Option<String>, data: impl Into<Arc<[u8]>>) -> String {
        let attachment = Attachment {
            index: self.attachments.len(),
            file_name,
            data: data.into(),
        };
        let token = attachment.token();
        trace!(%token, file_name = attachment.file_name(), size = attachment.data.len(),
               "collected attachment");
        self.attachments.push(attachment);
        token
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn into_attachments(self) -> Vec<Attachment> {
        self.attachments
    }
}

/// Serialize `value` to JSON, collecting the uploads it contains into `sink`.
pub fn to_wire<T>(value: &T, sink: &mut AttachmentSink) -> Result<JsonValue, WireError>
where
    T: ?Sized + Serialize,
{
    value.serialize(WireSerializer::new(sink))
}


// -----------------------------------------------------------------------------
//     WireSerializer
// -----------------------------------------------------------------------------

/// `serde` serializer producing a [`JsonValue`] and collecting uploads on the way.
///
/// It behaves like `serde_json::value::Serializer`, except for newtype structs
/// named [`UPLOAD_MARKER`], whose payload goes to the sink.
pub struct WireSerializer<'a> {
    sink: &'a mut AttachmentSink,
}

impl<'a> WireSerializer<'a> {
    pub fn new(sink: &'a mut AttachmentSink) -> Self {
        WireSerializer { sink }
    }

    fn collect_upload<T>(self, value: &T) -> Result<JsonValue, WireError>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(UploadCapture)? {
            Captured::Upload { file_name, data } => {
                Ok(JsonValue::String(self.sink.push(file_name, data)))
            },
            _ => Err(malformed("upload payload is missing its data")),
        }
    }
}

fn malformed(reason: &str) -> WireError {
    MalformedUploadSnafu { reason }.build().into()
}

type Result<T, E = WireError> = core::result::Result<T, E>;

impl<'a> ser::Serializer for WireSerializer<'a> {
    type Ok = JsonValue;
    type Error = WireError;

    type SerializeSeq = SeqBuilder<'a>;
    type SerializeTuple = SeqBuilder<'a>;
    type SerializeTupleStruct = SeqBuilder<'a>;
    type SerializeTupleVariant = TupleVariantBuilder<'a>;
    type SerializeMap = MapBuilder<'a>;
    type SerializeStruct = MapBuilder<'a>;
    type SerializeStructVariant = StructVariantBuilder<'a>;

    // -----------------------------------------------------------------------------
    //     Primitive types
    // -----------------------------------------------------------------------------

    fn serialize_bool(self, v: bool) -> Result<JsonValue> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsonValue> { self.serialize_i64(v as i64) }
    fn serialize_i16(self, v: i16) -> Result<JsonValue> { self.serialize_i64(v as i64) }
    fn serialize_i32(self, v: i32) -> Result<JsonValue> { self.serialize_i64(v as i64) }

    fn serialize_i64(self, v: i64) -> Result<JsonValue> {
        Ok(JsonValue::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<JsonValue> { self.serialize_u64(v as u64) }
    fn serialize_u16(self, v: u16) -> Result<JsonValue> { self.serialize_u64(v as u64) }
    fn serialize_u32(self, v: u32) -> Result<JsonValue> { self.serialize_u64(v as u64) }

    fn serialize_u64(self, v: u64) -> Result<JsonValue> {
        Ok(JsonValue::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<JsonValue> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<JsonValue> {
        // non-finite floats become `null`, as with `serde_json`
        Ok(JsonValue::from(v))
    }

    fn serialize_char(self, v: char) -> Result<JsonValue> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsonValue> {
        Ok(JsonValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<JsonValue> {
        Ok(JsonValue::Array(v.iter().map(|&b| JsonValue::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsonValue> {
        Ok(JsonValue::String(variant.to_owned()))
    }

    // -----------------------------------------------------------------------------
    //     Newtypes
    // -----------------------------------------------------------------------------

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        match name {
            UPLOAD_MARKER => self.collect_upload(value),
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsonValue>
    where
        T: ?Sized + Serialize,
    {
        let mut object = JsonMap::new();
        object.insert(variant.to_owned(), value.serialize(self)?);
        Ok(JsonValue::Object(object))
    }

    // -----------------------------------------------------------------------------
    //     Compound types
    // -----------------------------------------------------------------------------

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder<'a>> {
        Ok(SeqBuilder {
            sink: self.sink,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder<'a>> {
        Ok(TupleVariantBuilder {
            variant,
            seq: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder<'a>> {
        Ok(MapBuilder {
            sink: self.sink,
            map: JsonMap::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantBuilder<'a>> {
        Ok(StructVariantBuilder {
            variant,
            map: self.serialize_map(Some(len))?,
        })
    }
}

pub struct SeqBuilder<'a> {
    sink: &'a mut AttachmentSink,
    items: Vec<JsonValue>,
}

impl SeqBuilder<'_> {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let value = value.serialize(WireSerializer::new(&mut *self.sink))?;
        self.items.push(value);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Array(self.items))
    }
}

pub struct TupleVariantBuilder<'a> {
    variant: &'static str,
    seq: SeqBuilder<'a>,
}

impl ser::SerializeTupleVariant for TupleVariantBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.seq.push(value)
    }

    fn end(self) -> Result<JsonValue> {
        let mut object = JsonMap::new();
        object.insert(self.variant.to_owned(), JsonValue::Array(self.seq.items));
        Ok(JsonValue::Object(object))
    }
}

pub struct MapBuilder<'a> {
    sink: &'a mut AttachmentSink,
    map: JsonMap,
    next_key: Option<String>,
}

impl MapBuilder<'_> {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = value.serialize(WireSerializer::new(&mut *self.sink))?;
        self.map.insert(key, value);
        Ok(())
    }
}

/// JSON object keys need to be strings, numbers and booleans are converted as `serde_json` does.
fn key_to_string<T: ?Sized + Serialize>(key: &T) -> Result<String> {
    match key.serialize(serde_json::value::Serializer)? {
        JsonValue::String(s) => Ok(s),
        key @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Ok(key.to_string()),
        key => InvalidKeySnafu { key: key.to_string() }.fail(),
    }
}

impl ser::SerializeMap for MapBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key_to_string(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let Some(key) = self.next_key.take() else {
            return Err(ser::Error::custom("map value serialized before its key"));
        };
        self.insert(key, value)
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Object(self.map))
    }
}

impl ser::SerializeStruct for MapBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<JsonValue> {
        Ok(JsonValue::Object(self.map))
    }
}

pub struct StructVariantBuilder<'a> {
    variant: &'static str,
    map: MapBuilder<'a>,
}

impl ser::SerializeStructVariant for StructVariantBuilder<'_> {
    type Ok = JsonValue;
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.map.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<JsonValue> {
        let mut object = JsonMap::new();
        object.insert(self.variant.to_owned(), JsonValue::Object(self.map.map));
        Ok(JsonValue::Object(object))
    }
}


// -----------------------------------------------------------------------------
//     Upload payload capture
// -----------------------------------------------------------------------------

/// Payload of an upload, serialized as the tuple struct `(file_name, bytes)`.
///
/// Only the [`WireSerializer`] knows how to collect it: any human-readable
/// serializer gets an error instead of the raw bytes inlined in its output.
pub(crate) struct UploadPayload<'a> {
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

struct Bytes<'a>(&'a [u8]);

impl Serialize for Bytes<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl Serialize for UploadPayload<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use ser::SerializeTupleStruct;

        if serializer.is_human_readable() {
            return Err(ser::Error::custom(
                "malformed upload: local files can only be sent through an AttachmentSink, \
                 use telewire::attach::to_wire() or telewire::request::encode_request()"));
        }
        let mut fields = serializer.serialize_tuple_struct(UPLOAD_MARKER, 2)?;
        fields.serialize_field(&self.file_name)?;
        fields.serialize_field(&Bytes(self.data))?;
        fields.end()
    }
}

enum Captured {
    Nothing,
    Name(String),
    Data(Vec<u8>),
    Upload { file_name: Option<String>, data: Vec<u8> },
}

/// Serializer extracting the content of an [`UploadPayload`], rejecting anything else.
struct UploadCapture;

#[derive(Default)]
struct UploadFields {
    file_name: Option<String>,
    data: Option<Vec<u8>>,
}

macro_rules! reject {
    ($($method:ident($($arg:ty),*)),* $(,)?) => {
        $(
            fn $method(self, $(_: $arg),*) -> Result<Captured> {
                Err(malformed(concat!("unexpected value in upload payload: ", stringify!($method))))
            }
        )*
    };
}

impl ser::Serializer for UploadCapture {
    type Ok = Captured;
    type Error = WireError;

    type SerializeSeq = Impossible<Captured, WireError>;
    type SerializeTuple = Impossible<Captured, WireError>;
    type SerializeTupleStruct = UploadFields;
    type SerializeTupleVariant = Impossible<Captured, WireError>;
    type SerializeMap = Impossible<Captured, WireError>;
    type SerializeStruct = Impossible<Captured, WireError>;
    type SerializeStructVariant = Impossible<Captured, WireError>;

    fn is_human_readable(&self) -> bool {
        false
    }

    reject!(
        serialize_bool(bool),
        serialize_i8(i8), serialize_i16(i16), serialize_i32(i32), serialize_i64(i64),
        serialize_u8(u8), serialize_u16(u16), serialize_u32(u32), serialize_u64(u64),
        serialize_f32(f32), serialize_f64(f64),
        serialize_char(char),
        serialize_unit(),
        serialize_unit_struct(&'static str),
        serialize_unit_variant(&'static str, u32, &'static str),
    );

    fn serialize_str(self, v: &str) -> Result<Captured> {
        Ok(Captured::Name(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Captured> {
        Ok(Captured::Data(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Captured> {
        Ok(Captured::Nothing)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Captured> {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<Captured> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self, _name: &'static str, _variant_index: u32, _variant: &'static str, _value: &T,
    ) -> Result<Captured> {
        Err(malformed("unexpected enum in upload payload"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(malformed("unexpected sequence in upload payload"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(malformed("unexpected tuple in upload payload"))
    }

    fn serialize_tuple_struct(self, name: &'static str, _len: usize) -> Result<UploadFields> {
        match name {
            UPLOAD_MARKER => Ok(UploadFields::default()),
            _ => Err(malformed("unexpected struct in upload payload")),
        }
    }

    fn serialize_tuple_variant(
        self, _name: &'static str, _variant_index: u32, _variant: &'static str, _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(malformed("unexpected enum in upload payload"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(malformed("unexpected map in upload payload"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(malformed("unexpected struct in upload payload"))
    }

    fn serialize_struct_variant(
        self, _name: &'static str, _variant_index: u32, _variant: &'static str, _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(malformed("unexpected enum in upload payload"))
    }
}

impl ser::SerializeTupleStruct for UploadFields {
    type Ok = Captured;
    type Error = WireError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        match value.serialize(UploadCapture)? {
            Captured::Nothing => {},
            Captured::Name(name) => self.file_name = Some(name),
            Captured::Data(data) => self.data = Some(data),
            Captured::Upload { .. } => return Err(malformed("nested upload payload")),
        }
        Ok(())
    }

    fn end(self) -> Result<Captured> {
        match self.data {
            Some(data) => Ok(Captured::Upload { file_name: self.file_name, data }),
            None => Err(malformed("upload payload is missing its data")),
        }
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
