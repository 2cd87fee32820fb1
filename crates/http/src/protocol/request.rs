//! HTTP request types produced by the request parser.
//!
//! A [`Request`] is assembled incrementally by [`RequestParser`](crate::codec::RequestParser)
//! and handed out only once parsing has reached [`ParseState::Done`]; from then on
//! it is immutable.

use bytes::Bytes;

use crate::protocol::HeaderCollection;

/// Progress of a request parse.
///
/// States only move forward: `RequestLine -> Headers -> Body -> Done`.
/// `Error` is terminal and reachable from any state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseState {
    RequestLine,
    Headers,
    Body,
    Done,
    Error,
}

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
///
/// `version` holds the part after the `HTTP/` prefix, which is always `1.1`
/// for a parsed line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    pub fn new<M: Into<String>, T: Into<String>, V: Into<String>>(method: M, target: T, version: V) -> Self {
        Self { method: method.into(), target: target.into(), version: version.into() }
    }
}

/// A parsed HTTP request.
///
/// If the peer closed the stream before the message was complete, the fields
/// hold whatever was parsed up to that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: HeaderCollection,
    body: Bytes,
}

impl Request {
    pub fn new(request_line: RequestLine, headers: HeaderCollection, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    pub fn headers(&self) -> &HeaderCollection {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestLine, HeaderCollection, Bytes) {
        (self.request_line, self.headers, self.body)
    }
}
