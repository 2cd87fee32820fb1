//! Core HTTP protocol types.
//!
//! This module holds the values that flow between the codec and connection
//! layers: header collections, parsed requests, parse and writer states,
//! payload items and the error types.
//!
//! # Architecture
//!
//! - **Headers** (`header`): [`HeaderCollection`], case-insensitive and
//!   merge-on-repeat, with the single-line header parse step
//!
//! - **Request Processing** (`request`): [`Request`], [`RequestLine`] and the
//!   forward-only [`ParseState`]
//!
//! - **Response Processing** (`response`): [`WriterState`], reason phrases and
//!   [`default_headers`]
//!
//! - **Message Handling** (`message`): [`PayloadItem`], the unit fed to body encoders
//!
//! - **Error Handling** (`error`):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing and transport read errors
//!   - [`SendError`]: Writer state violations and transport write errors

mod header;
pub use header::HeaderCollection;
pub use header::Iter as HeaderIter;

mod message;
pub use message::PayloadItem;

mod request;
pub use request::ParseState;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::WriterState;
pub use response::default_headers;
pub use response::reason_phrase;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
