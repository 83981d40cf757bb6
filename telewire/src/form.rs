//!
//! `multipart/form-data` bodies (RFC 7578) for requests carrying uploads.
//!
//! The top-level properties of the request become text fields: strings are
//! sent as they are, any other value as its JSON text. Each collected
//! attachment becomes a binary part named after its index, which is what the
//! `attach://{index}` token written in the fields refers to.

use std::fmt::Write;

use tracing::trace;

use crate::attach::{Attachment, AttachmentSink};
use crate::{JsonMap, JsonValue};


const BOUNDARY_PREFIX: &str = "telewire-boundary-";

#[derive(Clone, Debug, PartialEq)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl MultipartForm {
    /// Build a form from the top-level properties of a request and the
    /// attachments collected while serializing it. `null` properties are left out.
    pub fn from_wire(properties: JsonMap, sink: AttachmentSink) -> Self {
        let fields = properties.into_iter()
            .filter_map(|(name, value)| match value {
                JsonValue::Null => None,
                JsonValue::String(s) => Some((name, s)),
                other => Some((name, other.to_string())),
            })
            .collect();

        MultipartForm { fields, attachments: sink.into_attachments() }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Return a boundary that does not occur in any part of the form.
    pub fn boundary(&self) -> String {
        let mut n: u64 = 0;
        loop {
            let boundary = format!("{BOUNDARY_PREFIX}{n:016x}");
            let delimiter = format!("--{boundary}");
            let collides = self.fields.iter().any(|(name, value)| {
                name.contains(&delimiter) || value.contains(&delimiter)
            }) || self.attachments.iter().any(|a| contains(a.data(), delimiter.as_bytes()));

            if !collides {
                return boundary;
            }
            trace!(boundary, "boundary occurs in the form content, trying another one");
            n += 1;
        }
    }

    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Render the body of the form.
    pub fn encode(&self, boundary: &str) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, value) in &self.fields {
            let mut header = String::new();
            let _ = write!(header, "--{boundary}\r\n");
            let _ = write!(header, "Content-Disposition: form-data; name=\"{}\"\r\n\r\n", quote(name));
            body.extend_from_slice(header.as_bytes());
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }

        for attachment in &self.attachments {
            let file_name = attachment.file_name()
                .map(str::to_owned)
                .unwrap_or_else(|| attachment.part_name());
            let content_type = mime_guess::from_path(&file_name).first_or_octet_stream();

            let mut header = String::new();
            let _ = write!(header, "--{boundary}\r\n");
            let _ = write!(header, "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                           attachment.part_name(), quote(&file_name));
            let _ = write!(header, "Content-Type: {content_type}\r\n\r\n");
            body.extend_from_slice(header.as_bytes());
            body.extend_from_slice(attachment.data());
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }
}

/// Percent-encode the characters that would end a quoted header parameter.
fn quote(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    fn sample() -> MultipartForm {
        let mut sink = AttachmentSink::new();
        sink.push(Some("cat.png".to_owned()), b"PNG".to_vec());
        sink.push(None, b"raw".to_vec());

        let properties = json!({
            "chat_id": "12",
            "photo": "attach://0",
            "disable_notification": true,
            "caption_entities": [{"type": "bold", "offset": 0, "length": 1}],
            "reply_markup": null,
        });
        let JsonValue::Object(properties) = properties else { unreachable!() };
        MultipartForm::from_wire(properties, sink)
    }

    #[test]
    fn fields() {
        let form = sample();
        assert_eq!(form.field("chat_id"), Some("12"));
        assert_eq!(form.field("photo"), Some("attach://0"));
        assert_eq!(form.field("disable_notification"), Some("true"));
        assert_eq!(form.field("caption_entities"), Some(r#"[{"type":"bold","offset":0,"length":1}]"#));
        assert_eq!(form.field("reply_markup"), None);
        assert_eq!(form.fields().len(), 4);
    }

    #[test]
    fn body() {
        let form = sample();
        let boundary = form.boundary();
        let body = String::from_utf8(form.encode(&boundary)).unwrap();

        assert!(body.starts_with(&format!("--{boundary}\r\nContent-Disposition: form-data; name=\"chat_id\"\r\n\r\n12\r\n")));
        assert!(body.contains("name=\"0\"; filename=\"cat.png\"\r\nContent-Type: image/png\r\n\r\nPNG\r\n"));
        assert!(body.contains("name=\"1\"; filename=\"1\"\r\nContent-Type: application/octet-stream\r\n\r\nraw\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
        assert_eq!(MultipartForm::content_type(&boundary), format!("multipart/form-data; boundary={boundary}"));
    }

    #[test]
    fn boundary_avoids_content() {
        let mut sink = AttachmentSink::new();
        sink.push(None, format!("--{BOUNDARY_PREFIX}{:016x}", 0).into_bytes());
        let form = MultipartForm::from_wire(JsonMap::new(), sink);
        assert_eq!(form.boundary(), format!("{BOUNDARY_PREFIX}{:016x}", 1));
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("a\"b\r\n.txt"), "a%22b%0D%0A.txt");
    }
}
