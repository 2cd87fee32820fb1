//! HTTP codec module for parsing requests and encoding responses
//!
//! This module contains the byte-level protocol work. Nothing in here performs
//! I/O: the parser consumes slices handed to it, and the encoders serialize into
//! a [`BytesMut`](bytes::BytesMut) that the connection layer writes out.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestParser`]: resumable request-line/headers/body state machine
//!   - Header lines are parsed by [`HeaderCollection::parse`](crate::protocol::HeaderCollection::parse)
//!   - Content-Length bodies are accumulated by [`LengthDecoder`]
//!
//! - Response handling:
//!   - [`HeaderEncoder`]: status line and header/trailer blocks
//!   - [`ChunkedEncoder`]: chunked transfer encoding, framed per [`ChunkFraming`]
//!
//! # Example
//!
//! ```
//! use raw_http::codec::{ChunkFraming, ChunkedEncoder};
//! use raw_http::protocol::PayloadItem;
//! use tokio_util::codec::Encoder;
//! use bytes::{Bytes, BytesMut};
//!
//! let mut encoder = ChunkedEncoder::new(ChunkFraming::Hex);
//! let mut buffer = BytesMut::new();
//! encoder.encode(PayloadItem::Chunk(Bytes::from_static(b"hello")), &mut buffer).unwrap();
//! encoder.encode(PayloadItem::<Bytes>::Eof, &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"5\r\nhello\r\n0\r\n");
//! ```

mod body;
mod header;
mod request_parser;

pub use body::{ChunkFraming, ChunkedEncoder, LengthDecoder, MAX_CHUNK_SIZE};
pub use header::HeaderEncoder;
pub use request_parser::RequestParser;
