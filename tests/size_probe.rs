//! HTTP size probing against a local server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use paperfolio::sizes::{HttpSizeProbe, SizeResolver, UNKNOWN_SIZE};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve canned responses; returns the base URL and a request counter.
async fn spawn_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let mut response = Vec::new();
                match path.as_str() {
                    "/site/declared.pdf" => {
                        response.extend_from_slice(
                            b"HTTP/1.1 200 OK\r\nContent-Length: 2048\r\nConnection: close\r\n\r\n",
                        );
                        response.extend(std::iter::repeat(b'x').take(2048));
                    }
                    "/site/chunked.pdf" => {
                        response.extend_from_slice(
                            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n1f4\r\n",
                        );
                        response.extend(std::iter::repeat(b'y').take(500));
                        response.extend_from_slice(b"\r\n0\r\n\r\n");
                    }
                    "/site/compressed.pdf" => {
                        response.extend_from_slice(
                            b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: 64\r\nConnection: close\r\n\r\n",
                        );
                        response.extend(std::iter::repeat(b'z').take(64));
                    }
                    _ => {
                        response.extend_from_slice(
                            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        );
                    }
                }
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}/site"), hits)
}

fn resolver(base: &str) -> SizeResolver {
    let probe = HttpSizeProbe::new(base, Duration::from_secs(5), None).unwrap();
    SizeResolver::new(Arc::new(probe))
}

#[tokio::test]
async fn content_length_is_used_and_cached() {
    let (base, hits) = spawn_server().await;
    let resolver = resolver(&base);

    assert_eq!(resolver.resolve_label("declared.pdf").await.unwrap(), "2.0 KB");
    assert_eq!(resolver.resolve_label("declared.pdf").await.unwrap(), "2.0 KB");
    assert_eq!(resolver.cached("declared.pdf"), Some(2048));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn body_is_measured_without_content_length() {
    let (base, _) = spawn_server().await;
    let resolver = resolver(&base);

    assert_eq!(resolver.resolve("chunked.pdf").await.unwrap(), 500);
    assert_eq!(resolver.resolve_label("chunked.pdf").await.unwrap(), "500 B");
}

#[tokio::test]
async fn error_status_reports_unknown_size() {
    let (base, _) = spawn_server().await;
    let resolver = resolver(&base);

    assert_eq!(resolver.resolve_label("missing.pdf").await.unwrap(), UNKNOWN_SIZE);
    assert_eq!(resolver.cached("missing.pdf"), None);
}

#[tokio::test]
async fn encoded_response_reports_declared_length() {
    let (base, _) = spawn_server().await;
    let resolver = resolver(&base);

    assert_eq!(resolver.resolve_label("compressed.pdf").await.unwrap(), "64 B");
    assert_eq!(resolver.cached("compressed.pdf"), Some(64));
}
