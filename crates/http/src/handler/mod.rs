//! Request handler abstraction.
//!
//! A [`Handler`] receives the parsed [`Request`] together with the connection's
//! [`ResponseWriter`] and drives the writer through its states itself. The
//! connection does not inspect what the handler writes.

use std::error::Error;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

/// Produces the response for one request.
///
/// An error returned while the writer is still waiting for its status line is
/// answered with `500 Internal Server Error`; later errors only end the exchange.
#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send,
{
    type Error: Into<Box<dyn Error + Send + Sync>> + Send;

    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) -> Result<(), Self::Error>;
}
