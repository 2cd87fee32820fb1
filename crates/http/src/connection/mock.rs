//! In-memory transports for connection tests.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Delivers `data` at most `step` bytes per read, then end-of-stream.
#[derive(Debug, Clone)]
pub(crate) struct SliceReader {
    data: Vec<u8>,
    pos: usize,
    step: usize,
}

impl SliceReader {
    pub(crate) fn new<D: Into<Vec<u8>>>(data: D, step: usize) -> Self {
        Self { data: data.into(), pos: 0, step }
    }
}

impl AsyncRead for SliceReader {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.data[self.pos..];
        let amt = remaining.len().min(self.step).min(buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.pos += amt;
        Poll::Ready(Ok(()))
    }
}

/// Fails every read with `ConnectionReset`.
#[derive(Debug)]
pub(crate) struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")))
    }
}

/// Keeps everything written and remembers whether it was shut down.
///
/// With [`failing_at`](Self::failing_at) the n-th write call (1-based) fails
/// with `BrokenPipe` and writes nothing; every other call succeeds.
#[derive(Debug, Default)]
pub(crate) struct RecordingWriter {
    pub(crate) data: Vec<u8>,
    pub(crate) shutdown: bool,
    writes: usize,
    fail_at: Option<usize>,
}

impl RecordingWriter {
    pub(crate) fn failing_at(write: usize) -> Self {
        Self { fail_at: Some(write), ..Self::default() }
    }
}

impl AsyncWrite for RecordingWriter {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.writes += 1;
        if self.fail_at == Some(self.writes) {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
        }
        self.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shutdown = true;
        Poll::Ready(Ok(()))
    }
}

/// Fails every write with `BrokenPipe`.
#[derive(Debug, Default)]
pub(crate) struct FailingWriter {
    pub(crate) attempts: usize,
}

impl AsyncWrite for FailingWriter {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
        self.attempts += 1;
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
