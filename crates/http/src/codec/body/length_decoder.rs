//! Decoder for request bodies framed by a Content-Length header.
//!
//! This module accumulates a payload whose size is declared up front, as defined in
//! [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use bytes::{Bytes, BytesMut};

use crate::ensure;
use crate::protocol::ParseError;

/// Upper bound for the up-front body allocation; larger bodies grow as they arrive.
const MAX_PREALLOCATE: usize = 64 * 1024;

/// A decoder for request bodies with a known content length.
///
/// The decoder tracks how many bytes are still owed and rejects any delivery
/// that carries more than that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The length announced by the Content-Length header
    declared: usize,
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `declared` - The total content length to decode, specified by Content-Length header
    pub fn new(declared: usize) -> Self {
        Self { declared, body: BytesMut::with_capacity(declared.min(MAX_PREALLOCATE)) }
    }

    /// Appends the bytes of `src` to the body.
    ///
    /// # Returns
    /// * `Ok(n)` with the number of bytes consumed, always `src.len()`
    ///
    /// # Errors
    /// * [`ParseError::BodyOverflow`] if `src` holds more bytes than the body still needs;
    ///   nothing is appended in that case
    pub fn decode(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let received = self.body.len() + src.len();
        ensure!(received <= self.declared, ParseError::body_overflow(self.declared, received));

        self.body.extend_from_slice(src);
        Ok(src.len())
    }

    /// Number of body bytes still expected.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.declared - self.body.len()
    }

    #[inline]
    pub fn is_finish(&self) -> bool {
        self.body.len() == self.declared
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}
