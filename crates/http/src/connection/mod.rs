//! HTTP connection handling module
//!
//! This module ties the codec to a byte-stream transport. Every connection
//! carries exactly one request and one response.
//!
//! # Components
//!
//! - [`StreamReader`]: pulls bytes from the transport into a growable buffer
//!   and feeds them to the request parser until a request is complete
//! - [`ResponseWriter`]: forward-only response state machine writing status
//!   line, headers and a fixed or chunked body
//! - [`HttpConnection`]: per-connection glue that reads the request, invokes
//!   the handler and closes the connection on every path

mod http_connection;
mod response_writer;
mod stream_reader;

#[cfg(test)]
pub(crate) mod mock;

pub use http_connection::HttpConnection;
pub use response_writer::ResponseWriter;
pub use stream_reader::INIT_BUFFER_SIZE;
pub use stream_reader::StreamReader;
