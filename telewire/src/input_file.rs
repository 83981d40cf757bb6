use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use snafu::ResultExt;

use crate::attach::{AttachError, IoSnafu, UploadPayload, UPLOAD_MARKER};
use crate::config::ATTACH_PREFIX;


fn absolute_url() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("valid regex")
    })
}

/// A file field of a request.
///
/// On the wire, a file already stored on the server is referenced by its id,
/// a remote file by its URL, and a local file is uploaded in a multipart body
/// and referenced by an `attach://{index}` token. The latter only works when
/// serializing through an [`AttachmentSink`](crate::attach::AttachmentSink).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputFile {
    /// Identifier of a file already stored on the server.
    Id(String),
    /// HTTP URL the server downloads the file from.
    Url(String),
    /// Local file, uploaded alongside the request.
    Upload(InputFileStream),
    /// An `attach://` token read back from the wire, the file itself is not available.
    Pending(String),
}

impl InputFile {
    pub fn id(id: impl Into<String>) -> Self {
        InputFile::Id(id.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        InputFile::Url(url.into())
    }

    pub fn upload(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        InputFile::Upload(InputFileStream::new(data).with_file_name(file_name))
    }

    /// Classify a file reference found on the wire.
    ///
    /// ## Example
    /// ```
    /// # use telewire::InputFile;
    /// assert!(matches!(InputFile::from_token("attach://0"), InputFile::Pending(_)));
    /// assert!(matches!(InputFile::from_token("https://example.com/cat.jpg"), InputFile::Url(_)));
    /// assert!(matches!(InputFile::from_token("AgACAgIAAxkBAAIB"), InputFile::Id(_)));
    /// ```
    pub fn from_token(token: &str) -> Self {
        if token.starts_with(ATTACH_PREFIX) {
            InputFile::Pending(token.to_owned())
        }
        else if absolute_url().is_match(token) {
            InputFile::Url(token.to_owned())
        }
        else {
            InputFile::Id(token.to_owned())
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, InputFile::Upload(_))
    }
}

impl From<InputFileStream> for InputFile {
    fn from(stream: InputFileStream) -> InputFile {
        InputFile::Upload(stream)
    }
}

impl Serialize for InputFile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            InputFile::Id(id) => serializer.serialize_str(id),
            InputFile::Url(url) => serializer.serialize_str(url),
            InputFile::Upload(stream) => stream.serialize(serializer),
            InputFile::Pending(token) => Err(ser::Error::custom(AttachError::UnsupportedFileReference {
                kind: format!("pending attachment {token}"),
            })),
        }
    }
}

impl<'de> Deserialize<'de> for InputFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TokenVisitor;

        impl de::Visitor<'_> for TokenVisitor {
            type Value = InputFile;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a file id, a URL or an attach:// token")
            }

            fn visit_str<E: de::Error>(self, token: &str) -> Result<InputFile, E> {
                Ok(InputFile::from_token(token))
            }
        }

        deserializer.deserialize_str(TokenVisitor)
    }
}


// -----------------------------------------------------------------------------
//     InputFileStream
// -----------------------------------------------------------------------------

/// Content of a local file to upload, with an optional file name.
#[derive(Clone, PartialEq, Eq)]
pub struct InputFileStream {
    file_name: Option<String>,
    data: Arc<[u8]>,
}

impl InputFileStream {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        InputFileStream { file_name: None, data: data.into() }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Read the whole content of `reader`.
    pub fn from_reader(mut reader: impl Read, file_name: &str) -> Result<Self, AttachError> {
        let mut data = vec![];
        reader.read_to_end(&mut data).context(IoSnafu { name: file_name })?;
        Ok(InputFileStream::new(data).with_file_name(file_name))
    }

    /// Read a file from disk, its file name is the last component of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AttachError> {
        let path = path.as_ref();
        let data = fs::read(path).context(IoSnafu { name: path.display().to_string() })?;
        let stream = InputFileStream::new(data);
        Ok(match path.file_name() {
            Some(name) => stream.with_file_name(name.to_string_lossy()),
            None => stream,
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for InputFileStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputFileStream")
            .field("file_name", &self.file_name)
            .field("size", &self.data.len())
            .finish()
    }
}

impl Serialize for InputFileStream {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(UPLOAD_MARKER, &UploadPayload {
            file_name: self.file_name(),
            data: self.data(),
        })
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
