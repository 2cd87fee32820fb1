//! HTTP response state and helpers.
//!
//! The response side has no owned message type: a handler streams the status
//! line, header block and body straight through a
//! [`ResponseWriter`](crate::connection::ResponseWriter), whose progress is
//! tracked by [`WriterState`].

use http::StatusCode;

use crate::protocol::HeaderCollection;

/// Progress of a response write. States only move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Done,
}

/// Reason phrase written after the status code.
///
/// Only the codes this server emits itself carry a phrase; every other code is
/// written with an empty one.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "OK",
        StatusCode::BAD_REQUEST => "Bad Request",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "",
    }
}

/// Headers for a complete, fixed-length response that closes the connection.
pub fn default_headers(content_length: usize) -> HeaderCollection {
    let mut headers = HeaderCollection::new();
    headers.set("Content-Length", &content_length.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/html");
    headers
}
