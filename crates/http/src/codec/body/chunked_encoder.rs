use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;
use tracing::warn;

/// Largest payload carried by a single chunk.
pub const MAX_CHUNK_SIZE: usize = 0xff;

/// How the size line in front of each chunk is written.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ChunkFraming {
    /// Textual lowercase hex size, e.g. `ff\r\n`; the terminator is `0\r\n`.
    #[default]
    Hex,
    /// A single raw size byte followed by `\r\n`; the terminator is the byte `0x00` then `\r\n`.
    RawByte,
}

/// Encodes `Transfer-Encoding: chunked` bodies.
///
/// Every data item is split into chunks of at most [`MAX_CHUNK_SIZE`] bytes. [`PayloadItem::Eof`]
/// writes only the last-chunk line; the trailer section that must follow it is written by
/// [`HeaderEncoder`](crate::codec::HeaderEncoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedEncoder {
    framing: ChunkFraming,
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new(framing: ChunkFraming) -> Self {
        Self { framing, eof: false, send_size: 0 }
    }

    pub fn framing(&self) -> ChunkFraming {
        self.framing
    }

    /// Total payload bytes encoded so far, excluding framing.
    pub fn send_size(&self) -> usize {
        self.send_size
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }

    fn encode_size(&self, size: usize, dst: &mut BytesMut) -> Result<(), SendError> {
        match self.framing {
            ChunkFraming::Hex => write!(helper::Writer(dst), "{size:x}\r\n")?,
            ChunkFraming::RawByte => {
                debug_assert!(size <= MAX_CHUNK_SIZE);
                dst.put_u8(size as u8);
                dst.put_slice(b"\r\n");
            }
        }
        Ok(())
    }
}

impl Default for ChunkedEncoder {
    fn default() -> Self {
        Self::new(ChunkFraming::default())
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            warn!("encode payload_item but chunked body already finished");
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(mut bytes) => {
                while bytes.has_remaining() {
                    let size = bytes.remaining().min(MAX_CHUNK_SIZE);
                    self.encode_size(size, dst)?;
                    dst.reserve(size + 2);
                    dst.put((&mut bytes).take(size));
                    dst.put_slice(b"\r\n");
                    self.send_size += size;
                }
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                self.encode_size(0, dst)
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
