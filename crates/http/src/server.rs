//! TCP accept loop.
//!
//! [`Server`] binds a listener and spawns one task per accepted connection.
//! Connections share nothing but the handler; a failing connection is logged
//! and never stops the loop.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

/// A running server.
///
/// Dropping the value leaves the accept loop running in the background; call
/// [`close`](Server::close) to stop it.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `addr` and starts accepting connections on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the address can't be bound.
    pub async fn bind<A, H>(addr: A, handler: H) -> io::Result<Self>
    where
        A: ToSocketAddrs,
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let tcp_listener = TcpListener::bind(addr).await.inspect_err(|e| error!(cause = %e, "bind server error"))?;
        let local_addr = tcp_listener.local_addr()?;
        info!(%local_addr, "start listening");

        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(tcp_listener, Arc::new(handler), Arc::clone(&shutdown)));

        Ok(Self { local_addr, shutdown, accept_task })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new connections and waits for the accept loop to exit.
    ///
    /// Connections that were already accepted run to completion on their own.
    pub async fn close(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.accept_task.await {
            warn!(cause = %e, "accept loop did not exit cleanly");
        }
        info!(local_addr = %self.local_addr, "server closed");
    }
}

async fn accept_loop<H>(tcp_listener: TcpListener, handler: Arc<H>, shutdown: Arc<Notify>)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        let (tcp_stream, remote_addr) = tokio::select! {
            () = shutdown.notified() => {
                debug!("stop accepting connections");
                return;
            }
            accepted = tcp_listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => debug!(%remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(%remote_addr, "connection has error, cause {}, connection shutdown", e),
            }
        });
    }
}
