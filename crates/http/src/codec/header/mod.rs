//! HTTP header encoding for responses
//!
//! Header *parsing* lives on [`HeaderCollection::parse`](crate::protocol::HeaderCollection::parse),
//! one line per call, driven by the [`RequestParser`](crate::codec::RequestParser).
//!
//! # Components
//!
//! - [`HeaderEncoder`]: Encodes status lines and header blocks to bytes
//!   - Status line with reason phrase
//!   - Header fields in collection order
//!   - Trailer sections after a chunked body

mod header_encoder;

pub use header_encoder::HeaderEncoder;
