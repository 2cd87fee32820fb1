//! HTTP request parser module
//!
//! This module provides a resumable request parser. It is fed the not-yet-consumed
//! tail of a receive buffer, consumes as many complete units (request line, header
//! lines, body bytes) as it can, and reports how many bytes it used. The caller
//! drops those bytes and calls again once more data has arrived.
//!
//! # State Machine
//!
//! ```text
//! RequestLine -> Headers -> Body -> Done
//!      \            \         \
//!       +------------+---------+--> Error
//! ```
//!
//! # Example
//!
//! ```
//! use raw_http::codec::RequestParser;
//!
//! let mut parser = RequestParser::new();
//! let consumed = parser.advance(b"GET / HTTP/1.1\r\nHost: local").unwrap();
//! assert_eq!(consumed, 16);
//!
//! let consumed = parser.advance(b"Host: localhost\r\n\r\n").unwrap();
//! assert_eq!(consumed, 19);
//! assert!(parser.is_done());
//! ```

use tracing::{debug, trace};

use crate::codec::body::LengthDecoder;
use crate::ensure;
use crate::protocol::{HeaderCollection, ParseError, ParseState, Request, RequestLine};
use crate::utils::{CRLF, find_crlf};

const SUPPORTED_VERSION: &[u8] = b"1.1";
const VERSION_PREFIX: &[u8] = b"HTTP/";

/// A resumable parser for a single HTTP/1.1 request.
///
/// Parsing a request without a Content-Length header finishes right after the
/// header section; chunked request bodies are not supported.
#[derive(Debug)]
pub struct RequestParser {
    state: ParseState,
    request_line: RequestLine,
    headers: HeaderCollection,
    body: Option<LengthDecoder>,
}

impl RequestParser {
    /// Creates a new `RequestParser` waiting for a request line
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Parses as much of `buf` as possible.
    ///
    /// `buf` must start at the first byte not consumed by a previous call.
    ///
    /// # Returns
    ///
    /// The number of bytes consumed from the front of `buf`. A value smaller than
    /// `buf.len()` while the parser is not done means the rest is an incomplete
    /// unit and more data is needed.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] moves the parser into [`ParseState::Error`]; every later
    /// call returns [`ParseError::Failed`].
    pub fn advance(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        self.parse(buf).inspect_err(|e| {
            if !matches!(e, ParseError::Failed) {
                trace!(state = ?self.state, cause = %e, "request parse failed");
            }
            self.state = ParseState::Error;
        })
    }

    /// Ends parsing because the peer will send nothing more.
    ///
    /// Whatever was parsed so far becomes the request; an incomplete message is
    /// not treated as an error. A failed parser stays failed.
    pub fn finish_at_eof(&mut self) {
        if matches!(self.state, ParseState::Done | ParseState::Error) {
            return;
        }
        debug!(state = ?self.state, "stream ended before request was complete");
        self.state = ParseState::Done;
    }

    /// Consumes the parser and returns the request parsed so far.
    pub fn into_request(self) -> Request {
        let body = self.body.map(LengthDecoder::into_body).unwrap_or_default();
        Request::new(self.request_line, self.headers, body)
    }

    fn parse(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;
        loop {
            let data = &buf[total..];
            match self.state {
                ParseState::RequestLine => {
                    let Some((request_line, consumed)) = parse_request_line(data)? else {
                        return Ok(total);
                    };
                    trace!(method = %request_line.method, target = %request_line.target, "parsed request line");
                    self.request_line = request_line;
                    self.state = ParseState::Headers;
                    total += consumed;
                }

                ParseState::Headers => {
                    let (consumed, done) = self.headers.parse(data)?;
                    if consumed == 0 {
                        return Ok(total);
                    }
                    total += consumed;
                    if done {
                        trace!(header_count = self.headers.len(), "parsed header section");
                        self.state = ParseState::Body;
                    }
                }

                ParseState::Body => {
                    let decoder = match &mut self.body {
                        Some(decoder) => decoder,
                        None => match self.headers.get("content-length") {
                            Some(value) => self.body.insert(LengthDecoder::new(parse_content_length(value)?)),
                            None => {
                                self.state = ParseState::Done;
                                return Ok(total);
                            }
                        },
                    };

                    total += decoder.decode(data)?;
                    if decoder.is_finish() {
                        self.state = ParseState::Done;
                    }
                    return Ok(total);
                }

                ParseState::Done => return Ok(total),

                ParseState::Error => return Err(ParseError::Failed),
            }
        }
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self {
            state: ParseState::RequestLine,
            request_line: RequestLine::default(),
            headers: HeaderCollection::new(),
            body: None,
        }
    }
}

/// Parses `METHOD SP TARGET SP HTTP/1.1 CRLF` from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` holds no complete line yet, otherwise the line and
/// the number of bytes it occupies including the CRLF.
pub(crate) fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(buf) else {
        return Ok(None);
    };

    let line = &buf[..line_end];
    let parts: Vec<&[u8]> = line.split(|b| *b == b' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::invalid_request_line(format!(
            "expected 3 space separated parts, found {} in {:?}",
            parts.len(),
            String::from_utf8_lossy(line)
        )));
    };

    ensure!(
        !method.is_empty() && method.iter().all(u8::is_ascii_uppercase),
        ParseError::invalid_method(method)
    );
    ensure!(target.starts_with(b"/"), ParseError::invalid_target(target));
    let version = parse_version(version)?;

    let request_line = RequestLine {
        method: String::from_utf8_lossy(method).into_owned(),
        target: String::from_utf8_lossy(target).into_owned(),
        version: String::from_utf8_lossy(version).into_owned(),
    };

    Ok(Some((request_line, line_end + CRLF.len())))
}

fn parse_version(version: &[u8]) -> Result<&[u8], ParseError> {
    let Some(number) = version.strip_prefix(VERSION_PREFIX) else {
        return Err(ParseError::invalid_version(format!(
            "{:?} does not start with HTTP/",
            String::from_utf8_lossy(version)
        )));
    };

    ensure!(!number.contains(&b'/'), ParseError::invalid_version("version has too many parts split by '/'"));
    ensure!(
        number == SUPPORTED_VERSION,
        ParseError::invalid_version(format!("HTTP/{} is not supported", String::from_utf8_lossy(number)))
    );
    Ok(number)
}

fn parse_content_length(value: &str) -> Result<usize, ParseError> {
    value.parse::<usize>().map_err(|e| ParseError::invalid_content_length(format!("value {value:?} is not usize: {e}")))
}
