use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::codec::RequestParser;
use crate::protocol::{ParseError, Request};

/// Default initial size of the receive buffer
pub const INIT_BUFFER_SIZE: usize = 1024;

/// Reads one request from a byte stream.
///
/// `StreamReader` owns a growable receive buffer. Each loop iteration reads whatever
/// the transport has available, feeds the unconsumed part of the buffer to a
/// [`RequestParser`] and drops the bytes the parser consumed, until the parser is done
/// or the peer closes the stream.
#[derive(Debug)]
pub struct StreamReader<R> {
    reader: R,
    buffer: ReadBuffer,
}

impl<R> StreamReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, INIT_BUFFER_SIZE)
    }

    /// Creates a reader whose receive buffer starts at `capacity` bytes.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: ReadBuffer::with_capacity(capacity) }
    }

    /// Current size of the receive buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads and parses a request.
    ///
    /// If the stream ends before the request is complete, the partially parsed
    /// request is returned rather than an error.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Io`] if reading from the transport fails
    /// - any other [`ParseError`] if the received bytes are not a valid request
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        let mut parser = RequestParser::new();

        while !parser.is_done() {
            self.buffer.make_room();

            let read = self.reader.read(self.buffer.unfilled_mut()).await.map_err(ParseError::io)?;
            if read == 0 {
                parser.finish_at_eof();
                break;
            }
            self.buffer.fill(read);

            let consumed = parser.advance(self.buffer.unconsumed())?;
            self.buffer.consume(consumed);
        }

        let request = parser.into_request();
        debug!(
            method = request.method(),
            target = request.target(),
            body_size = request.body().len(),
            "received request"
        );
        Ok(request)
    }
}

/// A receive buffer with separate read and write cursors.
///
/// `[0, read_pos)` has been consumed by the parser, `[read_pos, write_pos)` is
/// received but not yet consumed, `[write_pos, capacity)` is free.
#[derive(Debug)]
struct ReadBuffer {
    buf: BytesMut,
    read_pos: usize,
    write_pos: usize,
}

impl ReadBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::zeroed(capacity.max(1)), read_pos: 0, write_pos: 0 }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Makes sure there is at least one free byte after `write_pos`.
    ///
    /// A full buffer with consumed bytes at the front is compacted; a full buffer of
    /// unconsumed bytes doubles in size.
    fn make_room(&mut self) {
        if self.write_pos < self.capacity() {
            return;
        }

        if self.read_pos > 0 {
            self.buf.copy_within(self.read_pos..self.write_pos, 0);
            self.write_pos -= self.read_pos;
            self.read_pos = 0;
            trace!(unconsumed = self.write_pos, capacity = self.capacity(), "compacted receive buffer");
        } else {
            let capacity = self.capacity() * 2;
            self.buf.resize(capacity, 0);
            trace!(capacity, "grew receive buffer");
        }
    }

    #[inline]
    fn unfilled_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.write_pos..]
    }

    #[inline]
    fn fill(&mut self, n: usize) {
        debug_assert!(self.write_pos + n <= self.capacity());
        self.write_pos += n;
    }

    #[inline]
    fn unconsumed(&self) -> &[u8] {
        &self.buf[self.read_pos..self.write_pos]
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        debug_assert!(self.read_pos + n <= self.write_pos);
        self.read_pos += n;
    }
}
