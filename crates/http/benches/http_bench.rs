use std::hint::black_box;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use criterion::{Criterion, criterion_group, criterion_main};
use http::StatusCode;
use raw_http::codec::{ChunkFraming, ChunkedEncoder, HeaderEncoder, RequestParser};
use raw_http::connection::{HttpConnection, ResponseWriter, StreamReader};
use raw_http::handler::Handler;
use raw_http::protocol::{PayloadItem, Request, SendError, default_headers};
use tokio::io::AsyncWrite;
use tokio::runtime::Runtime;
use tokio_util::codec::Encoder;

const SIMPLE_REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

const POST_REQUEST: &[u8] = b"POST /submit HTTP/1.1\r\n\
Host: localhost:42069\r\n\
User-Agent: curl/7.81.0\r\n\
Accept: */*\r\n\
Content-Type: application/json\r\n\
Content-Length: 27\r\n\
\r\n\
{\"name\":\"bench\",\"size\":42}\n";

struct HelloWorld;

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
    type Error = SendError;

    async fn call(&self, writer: &mut ResponseWriter<W>, _request: Request) -> Result<(), Self::Error> {
        let body = b"Hello World!";
        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body).await?;
        Ok(())
    }
}

fn bench_request_parser(c: &mut Criterion) {
    c.bench_function("parse_simple_request", |b| {
        b.iter(|| {
            let mut parser = RequestParser::new();
            black_box(parser.advance(SIMPLE_REQUEST).unwrap());
            black_box(parser.into_request());
        });
    });

    c.bench_function("parse_request_byte_by_byte", |b| {
        b.iter(|| {
            let mut parser = RequestParser::new();
            let mut start = 0;
            let mut end = 1;
            while !parser.is_done() && end <= POST_REQUEST.len() {
                start += parser.advance(&POST_REQUEST[start..end]).unwrap();
                end += 1;
            }
            black_box(parser.into_request());
        });
    });
}

fn bench_stream_reader(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();

    c.bench_function("read_post_request", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut reader = StreamReader::with_capacity(POST_REQUEST, 8);
            black_box(reader.read_request().await.unwrap());
        });
    });
}

fn bench_response_encoders(c: &mut Criterion) {
    let headers = default_headers(12);
    let payload = Bytes::from(vec![b'x'; 4096]);

    c.bench_function("encode_status_and_headers", |b| {
        b.iter(|| {
            let mut encoder = HeaderEncoder;
            let mut bytes = BytesMut::new();
            encoder.encode(StatusCode::OK, &mut bytes).unwrap();
            encoder.encode(&headers, &mut bytes).unwrap();
            black_box(bytes);
        });
    });

    c.bench_function("encode_chunked_4k", |b| {
        b.iter(|| {
            let mut encoder = ChunkedEncoder::new(ChunkFraming::Hex);
            let mut bytes = BytesMut::new();
            encoder.encode(PayloadItem::Chunk(payload.clone()), &mut bytes).unwrap();
            encoder.encode(PayloadItem::<Bytes>::Eof, &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let handler = Arc::new(HelloWorld);

    c.bench_function("process_simple_request", |b| {
        b.to_async(&runtime).iter(|| async {
            let connection = HttpConnection::new(SIMPLE_REQUEST, Vec::new());
            black_box(connection.process(handler.clone()).await.unwrap());
        });
    });
}

criterion_group!(benches, bench_request_parser, bench_stream_reader, bench_response_encoders, bench_http_connection);
criterion_main!(benches);
