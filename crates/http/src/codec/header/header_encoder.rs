//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! This module provides functionality for encoding the status line and header
//! blocks of a response into raw bytes. The same header block format is used
//! for the trailer section that closes a chunked body.
//!
//! # Features
//!
//! - `HTTP/1.1 <code> <reason>\r\n` status line with a small reason-phrase table
//! - `name: value\r\n` field lines in collection order
//! - Blank line terminator after every header block

use crate::protocol::{HeaderCollection, SendError, reason_phrase};

use bytes::{BufMut, BytesMut};

use http::StatusCode;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for response status lines and header blocks.
///
/// - `Encoder<StatusCode>` writes the status line
/// - `Encoder<&HeaderCollection>` writes the field lines followed by the empty line
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl Encoder<StatusCode> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line into the provided bytes buffer.
    ///
    /// Codes without an entry in the reason-phrase table are written with an
    /// empty reason: `HTTP/1.1 404 \r\n`.
    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason_phrase(status))?;
        Ok(())
    }
}

impl Encoder<&HeaderCollection> for HeaderEncoder {
    type Error = SendError;

    /// Encodes a header block into the provided bytes buffer.
    ///
    /// An empty collection still produces the terminating `\r\n`.
    fn encode(&mut self, headers: &HeaderCollection, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        for (header_name, header_value) in headers {
            dst.put_slice(header_name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the destination buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    /// Writes a buffer into this writer, returning how many bytes were written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    /// Flush this output stream, ensuring that all intermediately buffered contents reach their destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
