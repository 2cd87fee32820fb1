//! Demo server on port 42069.
//!
//! ```text
//! curl -v http://127.0.0.1:42069/
//! curl -v http://127.0.0.1:42069/yourproblem
//! curl -v http://127.0.0.1:42069/myproblem
//! curl -v --raw http://127.0.0.1:42069/chunked/1000
//! ```

use async_trait::async_trait;
use http::StatusCode;
use raw_http::connection::ResponseWriter;
use raw_http::handler::Handler;
use raw_http::protocol::{HeaderCollection, Request, SendError, default_headers};
use raw_http::server::Server;
use tokio::io::AsyncWrite;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

const BAD_REQUEST_BODY: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>
";

const INTERNAL_ERROR_BODY: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>
";

const OK_BODY: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>
";

const STREAM_PIECE: usize = 1024;

struct DemoHandler;

impl DemoHandler {
    async fn html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_status_line(status).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body.as_bytes()).await?;
        Ok(())
    }

    async fn stream<W>(writer: &mut ResponseWriter<W>, total: usize) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut headers = HeaderCollection::new();
        headers.set("Connection", "close");
        headers.set("Transfer-Encoding", "chunked");
        headers.set("Content-Type", "text/plain");
        headers.set("Trailer", "X-Content-Length");

        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&headers).await?;

        let piece: Vec<u8> = (b'a'..=b'z').cycle().take(STREAM_PIECE).collect();
        let mut sent = 0;
        while sent < total {
            let n = (total - sent).min(piece.len());
            sent += writer.write_chunked_body(&piece[..n]).await?;
        }

        let mut trailers = HeaderCollection::new();
        trailers.set("X-Content-Length", &sent.to_string());
        writer.write_chunked_body_done(&trailers).await
    }
}

#[async_trait]
impl<W> Handler<W> for DemoHandler
where
    W: AsyncWrite + Unpin + Send,
{
    type Error = SendError;

    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), Self::Error> {
        let target = request.target();

        if let Some(total) = target.strip_prefix("/chunked/").and_then(|n| n.parse::<usize>().ok()) {
            return Self::stream(writer, total).await;
        }

        match target {
            "/yourproblem" => Self::html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_BODY).await,
            "/myproblem" => Self::html(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).await,
            _ => Self::html(writer, StatusCode::OK, OK_BODY).await,
        }
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::bind(("0.0.0.0", PORT), DemoHandler).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "failed to start server");
            return;
        }
    };
    info!(port = PORT, "server started");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for ctrl-c");
    }

    server.close().await;
    info!("server gracefully stopped");
}
