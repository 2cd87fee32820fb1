//! Prints every request received on port 42069 without answering it.
//!
//! ```text
//! curl -X POST -H 'Content-Type: text/plain' -d 'hello' http://127.0.0.1:42069/coffee
//! ```

use raw_http::connection::StreamReader;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let tcp_listener = match TcpListener::bind("0.0.0.0:42069").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };
    info!("listening on 0.0.0.0:42069");

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let mut reader = StreamReader::new(tcp_stream);
        let request = match reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                warn!(%remote_addr, cause = %e, "can't read request");
                continue;
            }
        };

        println!("Request line:");
        println!("- Method: {}", request.method());
        println!("- Target: {}", request.target());
        println!("- Version: {}", request.version());
        println!("Headers:");
        for (name, value) in request.headers() {
            println!("- {name}: {value}");
        }
        println!("Body:");
        println!("{}", String::from_utf8_lossy(request.body()));
    }
}
