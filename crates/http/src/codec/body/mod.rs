//! HTTP body handling module for processing request and response payloads
//!
//! # Components
//!
//! ## Decoders
//! - [`LengthDecoder`]: Accumulates a request body announced by Content-Length
//!
//! ## Encoders
//! - [`ChunkedEncoder`]: Implements chunked transfer encoding for responses,
//!   with the chunk-size line written as selected by [`ChunkFraming`]
//!
//! Request bodies are never chunked; a request without Content-Length has no body.

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkFraming;
pub use chunked_encoder::ChunkedEncoder;
pub use chunked_encoder::MAX_CHUNK_SIZE;
pub use length_decoder::LengthDecoder;
