use std::error::Error;
use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info, warn};

use crate::connection::{ResponseWriter, StreamReader};
use crate::handler::Handler;
use crate::protocol::{HttpError, WriterState, default_headers};

const INTERNAL_ERROR_BODY: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>The server failed to handle this request.</p>
  </body>
</html>
";

/// A single HTTP exchange over one connection.
///
/// `HttpConnection` reads exactly one request, hands it to the handler with a
/// fresh [`ResponseWriter`], and then shuts the write side down. There is no
/// keep-alive: every connection carries one request and one response.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: StreamReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::from_parts(StreamReader::new(reader), ResponseWriter::new(writer))
    }

    /// Builds a connection from an already configured reader and writer.
    pub fn from_parts(reader: StreamReader<R>, writer: ResponseWriter<W>) -> Self {
        Self { reader, writer }
    }

    /// Runs the exchange and closes the connection.
    ///
    /// The write side is shut down on every path, including parse and handler
    /// failures. A request that fails to parse gets no response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::RequestError`] if reading or parsing the request failed
    /// - [`HttpError::ResponseError`] if writing the fallback error response failed
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let result = self.do_process(handler.as_ref()).await;

        if let Err(e) = self.writer.shutdown().await {
            warn!(cause = %e, "failed to shut down connection");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "can't read request, close connection without response");
                return Err(e.into());
            }
        };

        let method = request.method().to_owned();
        let target = request.target().to_owned();

        let result: Result<(), Box<dyn Error + Send + Sync>> = handler.call(&mut self.writer, request).await.map_err(Into::into);
        if let Err(e) = result {
            error!(%method, %target, "handle request error, cause: {}", e);

            if self.writer.state() == WriterState::StatusLine {
                self.send_internal_error().await?;
            }
            return Ok(());
        }

        match self.writer.state() {
            WriterState::Done => info!(%method, %target, "response sent"),
            state => warn!(%method, %target, ?state, "handler returned before the response was complete"),
        }
        Ok(())
    }

    async fn send_internal_error(&mut self) -> Result<(), HttpError> {
        let body = INTERNAL_ERROR_BODY.as_bytes();
        self.writer.write_status_line(StatusCode::INTERNAL_SERVER_ERROR).await?;
        self.writer.write_headers(&default_headers(body.len())).await?;
        self.writer.write_body(body).await?;
        Ok(())
    }
}
