//!
//! This library provides the wire codec of a client for the
//! [Telegram Bot API](https://core.telegram.org/bots/api): it converts between
//! Rust values and the JSON / `multipart/form-data` bodies exchanged with the server.
//!
//! Most of the API is made of plain records which map directly to `serde`
//! structs. The interesting parts are the few places where the wire format
//! needs more than that:
//!
//!  - **open types**: families of records told apart by a discriminator field
//!    (`type`, `status`, `source`, or even whether a `date` is `0`). They are
//!    Rust enums deriving [`OpenType`](macro@OpenType), see the [`variant`] module.
//!  - **wire enums**: string tokens mapped to enum constants, tolerant to tokens
//!    added server-side. See the [`wire_enum`] module.
//!  - **uploads**: local files are sent in a multipart body and referenced from
//!    the JSON fields by `attach://N` tokens, assigned while serializing the
//!    request. See the [`attach`], [`form`] and [`request`] modules.
//!  - **scalars** with special rules: timestamps where `0` means "unset",
//!    colors, chat ids. See the [`types`] module.
//!
//! A representative set of API records is provided in the [`schema`] module.
//!
//! # Feature flags
//!
//! - `cli`: whether to compile the command-line tools alongside the library.
//!          This feature is enabled by default and currently installs the `twconv` tool.
//!
//! # Sending a request
//!
//! ```
//! # use telewire::{ChatId, InputFile, request::{encode_request, RequestBody, SendPhoto}};
//! let request = SendPhoto::new(ChatId::Id(42), InputFile::upload("cat.jpg", b"...".to_vec()));
//!
//! let RequestBody::Multipart(form) = encode_request(&request)? else { unreachable!() };
//! assert_eq!(form.field("photo"), Some("attach://0"));
//! assert_eq!(form.attachments()[0].file_name(), Some("cat.jpg"));
//! # Ok::<(), telewire::WireError>(())
//! ```
//!
//! # `twconv` CLI tool
//!
//! The `twconv` tool decodes JSON values as one of the types of this library
//! and prints them back normalized, which is handy to check what the codecs make
//! of a given payload.
//!
//! Example:
//! ```sh
//! $ twconv -h  # always nice to read the help to know what a program can do!
//!
//! $ twconv decode chat-member '{"status": "kicked", "user": {"id": 1, "is_bot": false, "first_name": "A"}, "until_date": 0}'
//! ```

// this is needed to be able to call the `OpenType` derive macro, which needs
// access to the `telewire` crate
extern crate self as telewire;

pub mod attach;
pub mod config;
pub mod error;
pub mod form;
pub mod input_file;
pub mod request;
pub mod schema;
pub mod types;
pub mod variant;
pub mod wire_enum;

pub use serde_json::{
    Value as JsonValue,
    Error as JsonError,
    json
};

/// JSON object, as used by the open type decoders.
pub type JsonMap = serde_json::Map<String, JsonValue>;

pub use error::WireError;
pub use input_file::{InputFile, InputFileStream};
pub use variant::{OpenType, VariantError};
pub use wire_enum::{EnumError, WireEnum};

pub use types::*;
pub use schema::*;

/// Implement [`OpenType`](trait@OpenType) and `serde::Deserialize` for an enum
/// whose variants are the records of an open type.
///
/// The `Serialize` half is derived by `serde` from the same attributes.
///
/// # Example
///
/// ```
/// # use serde::{Deserialize, Serialize};
/// # use telewire::{json, OpenType};
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Circle { radius: u32 }
///
/// #[derive(Debug, PartialEq, Serialize, OpenType)]
/// #[serde(tag = "kind", rename_all = "snake_case")]
/// enum Shape {
///     Circle(Circle),
///     #[serde(rename = "dot")]
///     Point,
/// }
///
/// let shape: Shape = serde_json::from_value(json!({"radius": 3, "kind": "circle"}))?;
/// assert_eq!(shape, Shape::Circle(Circle { radius: 3 }));
/// assert_eq!(serde_json::to_value(&Shape::Point)?, json!({"kind": "dot"}));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub use telewire_macros::OpenType;

#[doc(hidden)]
pub use serde as __serde;
