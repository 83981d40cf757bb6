//!
//! Request bodies and response envelopes of Bot API methods.
//!
//! A request is serialized once, with a fresh [`AttachmentSink`]. If no upload
//! was met, the JSON text is the body. Otherwise the body is a
//! `multipart/form-data` form holding one text field per top-level property
//! and one binary part per upload (see [`crate::form`]).
//!
//! Sending the body and receiving the response are left to the caller, who
//! hands the raw response bytes to [`decode_response()`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, trace, warn};

use crate::attach::{to_wire, AttachmentSink};
use crate::config::JSON_CONTENT_TYPE;
use crate::error::BodyNotAnObjectSnafu;
use crate::form::MultipartForm;
use crate::{JsonError, JsonValue, WireError};

pub mod methods;

pub use methods::*;


/// A Bot API method call.
pub trait BotRequest: Serialize {
    type Response: DeserializeOwned;

    /// Name of the method, as found in the URL.
    const METHOD: &'static str;
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }

    /// Return the `Content-Type` header and the bytes to send.
    pub fn into_http(self) -> (String, Vec<u8>) {
        match self {
            RequestBody::Json(bytes) => (JSON_CONTENT_TYPE.to_owned(), bytes),
            RequestBody::Multipart(form) => {
                let boundary = form.boundary();
                (MultipartForm::content_type(&boundary), form.encode(&boundary))
            },
        }
    }
}

/// Serialize a request into the body to send, choosing between JSON and
/// `multipart/form-data` depending on whether it carries uploads.
pub fn encode_request<R: BotRequest>(request: &R) -> Result<RequestBody, WireError> {
    let mut sink = AttachmentSink::new();
    let wire = to_wire(request, &mut sink)?;

    let JsonValue::Object(properties) = wire else {
        return BodyNotAnObjectSnafu { method: R::METHOD, value: Box::new(wire) }.fail();
    };

    if sink.is_empty() {
        trace!(method = R::METHOD, "encoding request as JSON");
        return Ok(RequestBody::Json(serde_json::to_vec(&properties)?));
    }

    debug!(method = R::METHOD, attachments = sink.len(), "encoding request as multipart/form-data");
    Ok(RequestBody::Multipart(MultipartForm::from_wire(properties, sink)))
}


// -----------------------------------------------------------------------------
//     Response envelope
// -----------------------------------------------------------------------------

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("request failed with error {error_code}: {description}"))]
    Request {
        error_code: i32,
        description: String,
        /// Number of seconds to wait before repeating the request, when flood control was hit.
        retry_after: Option<u32>,
        /// The group was upgraded to a supergroup with this id.
        migrate_to_chat_id: Option<i64>,
    },

    #[snafu(display("cannot decode response envelope: {source}"))]
    Envelope { source: JsonError },

    #[snafu(display("response is marked as successful but has no result"))]
    MissingResult,
}

#[derive(Eq, Hash, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u32>,
}

/// Envelope wrapping every response of the Bot API.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.ok {
            return self.result.context(MissingResultSnafu);
        }

        let parameters = self.parameters.unwrap_or_default();
        let error = RequestSnafu {
            error_code: self.error_code.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            retry_after: parameters.retry_after,
            migrate_to_chat_id: parameters.migrate_to_chat_id,
        }.build();
        warn!(%error, "received error response");
        Err(error)
    }
}

/// Decode the raw bytes of a response into the result of the method.
///
/// ## Example
/// ```
/// # use telewire::request::{decode_response, ApiError};
/// let ok: bool = decode_response(br#"{"ok": true, "result": true}"#)?;
/// assert!(ok);
///
/// let err = decode_response::<bool>(br#"{"ok": false, "error_code": 429,
///     "description": "Too Many Requests: retry after 5", "parameters": {"retry_after": 5}}"#);
/// assert!(matches!(err, Err(ApiError::Request { retry_after: Some(5), .. })));
/// # Ok::<(), ApiError>(())
/// ```
pub fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let envelope: ApiResponse<T> = serde_json::from_slice(bytes).context(EnvelopeSnafu)?;
    envelope.into_result()
}
