//!
//! Constants shared by the codecs and the tools built on top of them.
//!

/// Version of the library, as given by `git describe` at build time
/// (falls back to the cargo package version).
pub const VERSION: &str = include_str!(concat!(env!("OUT_DIR"), "/version"));

/// Base URL of the public Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Prefix of the synthetic tokens standing in for uploaded files in a JSON body.
pub const ATTACH_PREFIX: &str = "attach://";

/// Content type of a request body without attachments.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Full URL of a Bot API method.
///
/// ## Example
/// ```
/// # use telewire::config::{method_url, DEFAULT_API_URL};
/// assert_eq!(method_url(DEFAULT_API_URL, "123:abc", "getMe"),
///            "https://api.telegram.org/bot123:abc/getMe");
/// ```
pub fn method_url(base: &str, token: &str, method: &str) -> String {
    format!("{}/bot{}/{}", base.trim_end_matches('/'), token, method)
}
