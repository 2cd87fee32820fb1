use bytes::{Bytes, BytesMut};
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::codec::{ChunkFraming, ChunkedEncoder, HeaderEncoder};
use crate::protocol::{HeaderCollection, PayloadItem, SendError, WriterState};

/// Initial size of the encode buffer
const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// Writes one response to a byte stream.
///
/// The writer only moves forward through `StatusLine -> Headers -> Body -> Done`.
/// Each operation checks the current state first; when called out of order it
/// returns [`SendError::InvalidState`] without touching the transport.
///
/// A body is written either once with [`write_body`](Self::write_body), or as any
/// number of [`write_chunked_body`](Self::write_chunked_body) calls closed by
/// [`write_chunked_body_done`](Self::write_chunked_body_done).
///
/// Transport failures are returned as [`SendError::Io`] and are not retried; the
/// state does not advance when the write failed, except for
/// [`write_chunked_body_done`](Self::write_chunked_body_done) which always finishes.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    header_encoder: HeaderEncoder,
    chunked_encoder: ChunkedEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_framing(writer, ChunkFraming::default())
    }

    /// Creates a writer whose chunked bodies use the given size-line framing.
    pub fn with_framing(writer: W, framing: ChunkFraming) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            state: WriterState::StatusLine,
            header_encoder: HeaderEncoder,
            chunked_encoder: ChunkedEncoder::new(framing),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.expect_state(WriterState::StatusLine)?;

        self.header_encoder.encode(status, &mut self.buffer)?;
        self.flush().await?;

        self.state = WriterState::Headers;
        Ok(())
    }

    /// Writes every header as `name: value\r\n`, then the empty line.
    pub async fn write_headers(&mut self, headers: &HeaderCollection) -> Result<(), SendError> {
        self.expect_state(WriterState::Headers)?;

        self.header_encoder.encode(headers, &mut self.buffer)?;
        self.flush().await?;

        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes the whole body verbatim and finishes the response.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state(WriterState::Body)?;

        self.writer.write_all(body).await?;
        self.writer.flush().await?;

        self.state = WriterState::Done;
        Ok(body.len())
    }

    /// Writes `body` as one or more chunks of at most
    /// [`MAX_CHUNK_SIZE`](crate::codec::MAX_CHUNK_SIZE) bytes.
    ///
    /// The writer stays in the body state so the call can be repeated.
    ///
    /// # Returns
    ///
    /// The number of payload bytes written, excluding framing.
    pub async fn write_chunked_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state(WriterState::Body)?;

        self.chunked_encoder.encode(PayloadItem::Chunk(body), &mut self.buffer)?;
        self.flush().await?;

        Ok(body.len())
    }

    /// Writes the last chunk and the trailer section, finishing the response.
    ///
    /// `trailers` may be empty, in which case only the blank line follows the
    /// last chunk.
    ///
    /// The writer ends in the done state even when the transport write fails:
    /// the chunked encoder is closed by then, so the body can't be continued.
    pub async fn write_chunked_body_done(&mut self, trailers: &HeaderCollection) -> Result<(), SendError> {
        self.expect_state(WriterState::Body)?;

        self.chunked_encoder.encode(PayloadItem::<Bytes>::Eof, &mut self.buffer)?;
        self.header_encoder.encode(trailers, &mut self.buffer)?;
        let result = self.flush().await;

        self.state = WriterState::Done;
        result
    }

    /// Shuts down the write side of the transport.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        Ok(self.writer.shutdown().await?)
    }

    fn expect_state(&self, expected: WriterState) -> Result<(), SendError> {
        if self.state != expected {
            error!(expected = ?expected, actual = ?self.state, "response writer used out of order");
            return Err(SendError::invalid_state(expected, self.state));
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let result = self.writer.write_all(self.buffer.as_ref()).await;
        self.buffer.clear();
        result?;

        Ok(self.writer.flush().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::mock::{FailingWriter, RecordingWriter};
    use crate::protocol::default_headers;

    #[tokio::test]
    async fn fixed_body_response() {
        let body = b"<h1>Success!</h1>";
        let mut writer = ResponseWriter::new(Vec::new());

        writer.write_status_line(StatusCode::OK).await.unwrap();
        assert_eq!(writer.state(), WriterState::Headers);
        writer.write_headers(&default_headers(body.len())).await.unwrap();
        assert_eq!(writer.state(), WriterState::Body);
        assert_eq!(writer.write_body(body).await.unwrap(), body.len());
        assert_eq!(writer.state(), WriterState::Done);

        let expected = "HTTP/1.1 200 OK\r\n\
                        content-length: 17\r\n\
                        connection: close\r\n\
                        content-type: text/html\r\n\
                        \r\n\
                        <h1>Success!</h1>";
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), expected);
    }

    #[tokio::test]
    async fn unknown_status_has_empty_reason() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::IM_A_TEAPOT).await.unwrap();
        assert_eq!(writer.into_inner(), b"HTTP/1.1 418 \r\n");
    }

    #[tokio::test]
    async fn chunked_body_raw_byte_framing() {
        let body = [b'x'; 300];
        let mut writer = ResponseWriter::with_framing(Vec::new(), ChunkFraming::RawByte);
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();
        let head_len = writer.get_ref().len();

        assert_eq!(writer.write_chunked_body(&body).await.unwrap(), 300);
        assert_eq!(writer.state(), WriterState::Body);
        writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap();
        assert_eq!(writer.state(), WriterState::Done);

        let mut expected = vec![0xff, b'\r', b'\n'];
        expected.extend_from_slice(&body[..255]);
        expected.extend_from_slice(b"\r\n");
        expected.extend_from_slice(&[45, b'\r', b'\n']);
        expected.extend_from_slice(&body[255..]);
        expected.extend_from_slice(b"\r\n");
        expected.extend_from_slice(&[0x00, b'\r', b'\n']);
        expected.extend_from_slice(b"\r\n");

        assert_eq!(&writer.into_inner()[head_len..], &expected[..]);
    }

    #[tokio::test]
    async fn chunked_body_with_trailers() {
        let mut headers = HeaderCollection::new();
        headers.set("Transfer-Encoding", "chunked");
        headers.set("Trailer", "X-Content-Length");

        let mut trailers = HeaderCollection::new();
        trailers.set("X-Content-Length", "11");

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        writer.write_chunked_body(b"hello ").await.unwrap();
        writer.write_chunked_body(b"").await.unwrap();
        writer.write_chunked_body(b"world").await.unwrap();
        writer.write_chunked_body_done(&trailers).await.unwrap();

        let expected = "HTTP/1.1 200 OK\r\n\
                        transfer-encoding: chunked\r\n\
                        trailer: X-Content-Length\r\n\
                        \r\n\
                        6\r\nhello \r\n\
                        5\r\nworld\r\n\
                        0\r\n\
                        x-content-length: 11\r\n\
                        \r\n";
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), expected);
    }

    #[tokio::test]
    async fn body_before_headers_is_rejected() {
        let mut writer = ResponseWriter::new(Vec::new());

        let result = writer.write_body(b"too early").await;
        assert!(matches!(
            result,
            Err(SendError::InvalidState { expected: WriterState::Body, actual: WriterState::StatusLine })
        ));

        writer.write_status_line(StatusCode::OK).await.unwrap();
        let result = writer.write_body(b"still too early").await;
        assert!(matches!(result, Err(SendError::InvalidState { actual: WriterState::Headers, .. })));

        assert_eq!(writer.state(), WriterState::Headers);
        assert_eq!(writer.into_inner(), b"HTTP/1.1 200 OK\r\n");
    }

    #[tokio::test]
    async fn no_writes_after_done() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();
        writer.write_body(b"ok").await.unwrap();
        let written = writer.get_ref().len();

        assert!(writer.write_status_line(StatusCode::OK).await.unwrap_err().is_invalid_state());
        assert!(writer.write_headers(&HeaderCollection::new()).await.unwrap_err().is_invalid_state());
        assert!(writer.write_body(b"again").await.unwrap_err().is_invalid_state());
        assert!(writer.write_chunked_body(b"again").await.unwrap_err().is_invalid_state());
        assert!(writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap_err().is_invalid_state());

        assert_eq!(writer.get_ref().len(), written);
    }

    #[tokio::test]
    async fn status_line_twice_is_rejected() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        let err = writer.write_status_line(StatusCode::BAD_REQUEST).await.unwrap_err();
        assert!(matches!(err, SendError::InvalidState { expected: WriterState::StatusLine, actual: WriterState::Headers }));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let mut writer = ResponseWriter::new(FailingWriter::default());

        let err = writer.write_status_line(StatusCode::OK).await.unwrap_err();
        assert!(err.is_io());
        assert_eq!(writer.state(), WriterState::StatusLine);
        assert_eq!(writer.get_ref().attempts, 1);
    }

    #[tokio::test]
    async fn failed_chunked_done_finishes_the_writer() {
        let mut writer = ResponseWriter::new(RecordingWriter::failing_at(3));
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();

        let err = writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap_err();
        assert!(err.is_io());
        assert_eq!(writer.state(), WriterState::Done);
        let written = writer.get_ref().data.len();

        assert!(writer.write_chunked_body(b"payload").await.unwrap_err().is_invalid_state());
        assert!(writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap_err().is_invalid_state());
        assert_eq!(writer.get_ref().data.len(), written);
    }

    #[tokio::test]
    async fn failed_chunk_keeps_body_open() {
        let mut writer = ResponseWriter::new(RecordingWriter::failing_at(3));
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();

        assert!(writer.write_chunked_body(b"lost").await.unwrap_err().is_io());
        assert_eq!(writer.state(), WriterState::Body);

        assert_eq!(writer.write_chunked_body(b"hello").await.unwrap(), 5);
        writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap();
        assert_eq!(writer.state(), WriterState::Done);
        assert!(writer.into_inner().data.ends_with(b"\r\n\r\n5\r\nhello\r\n0\r\n\r\n"));
    }

    #[tokio::test]
    async fn state_errors_do_no_io() {
        let mut writer = ResponseWriter::new(FailingWriter::default());
        assert!(writer.write_body(b"body").await.unwrap_err().is_invalid_state());
        assert!(writer.write_chunked_body_done(&HeaderCollection::new()).await.unwrap_err().is_invalid_state());
        assert_eq!(writer.get_ref().attempts, 0);
    }
}
