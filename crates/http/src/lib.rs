//! HTTP/1.1 message exchange directly over a byte stream
//!
//! This crate parses HTTP/1.1 requests from a raw transport and writes responses
//! back to it without any HTTP library underneath. It handles partial reads,
//! grows its receive buffer on demand, resumes parsing across reads, enforces the
//! order of response writes and produces chunked bodies with trailers.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use raw_http::connection::ResponseWriter;
//! use raw_http::handler::Handler;
//! use raw_http::protocol::{default_headers, Request, SendError};
//! use raw_http::server::Server;
//! use tokio::io::AsyncWrite;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
//!     type Error = SendError;
//!
//!     async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), SendError> {
//!         let body = format!("Hello {}!\r\n", request.target());
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body.as_bytes()).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::bind("127.0.0.1:42069", HelloWorld).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: header collection, request and state types, errors
//! - [`codec`]: request parser and response encoders, no I/O
//! - [`connection`]: stream reader, response writer and per-connection glue
//! - [`handler`]: the trait a request handler implements
//! - [`server`]: TCP accept loop
//!
//! # Data Flow
//!
//! ```text
//! transport bytes -> StreamReader buffer -> RequestParser -> Request
//!     -> Handler -> ResponseWriter -> transport bytes
//! ```
//!
//! # Error Handling
//!
//! - [`protocol::ParseError`]: malformed request or transport read failure; the
//!   connection is closed without a response
//! - [`protocol::SendError`]: writer used out of order, or transport write failure
//! - [`protocol::HttpError`]: top-level error of a connection
//!
//! A stream that ends before the request is complete is not an error: the
//! request parsed so far is handed to the handler.
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request per connection, no keep-alive
//! - No chunked request bodies; a request without Content-Length has no body
//! - No TLS support (use a reverse proxy for HTTPS)

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
