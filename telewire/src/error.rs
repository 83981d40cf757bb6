use std::fmt;

use snafu::{IntoError, Snafu};

use crate::{JsonError, JsonValue, attach::AttachError};


/// Define the `From` conversion from an error type to another, where the first
/// is the source of the second. It will use the given `Snafu` context selector
/// to do so.
///
/// You need to `use snafu::IntoError` in order to be able to use this macro.
#[macro_export]
macro_rules! impl_auto_error_conversion {
    ($src:ty, $target:ty, $snafu:ident) => {
        impl From<$src> for $target {
            fn from(value: $src) -> $target {
                $snafu.into_error(value)
            }
        }
    };
}


/// Error raised while turning an outbound value into its wire representation.
///
/// This is the error type of the [`WireSerializer`](crate::attach::WireSerializer),
/// so any error raised by a `Serialize` implementation down the value graph
/// (unencodable enum constant, pre-epoch timestamp, ...) ends up as a
/// [`WireError::Custom`] carrying its message.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WireError {
    #[snafu(display("{message}"))]
    Custom { message: String },

    #[snafu(display("cannot convert value to JSON: {source}"))]
    Json { source: JsonError },

    #[snafu(display("attachment error: {source}"))]
    Attach { source: AttachError },

    #[snafu(display("map keys need to serialize as strings, got: {key}"))]
    InvalidKey { key: String },

    #[snafu(display(r#"body of method "{method}" needs to be a JSON object, got: {value}"#))]
    BodyNotAnObject { method: String, value: Box<JsonValue> },
}

impl serde::ser::Error for WireError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        WireError::Custom { message: msg.to_string() }
    }
}

impl_auto_error_conversion!(JsonError, WireError, JsonSnafu);
impl_auto_error_conversion!(AttachError, WireError, AttachSnafu);
