//! Integration tests for URL sources against an in-process HTTP stub.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pixcat::{ImageSource, PixcatError, Size, TermImage};

/// Serve every request with the same status line and body
async fn serve(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let header = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(header.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("http client")
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbaImage::from_pixel(3, 2, Rgba([200, 100, 50, 255]))
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_not_found_url_writes_nothing() {
    let base = serve("404 Not Found", b"missing".to_vec()).await;
    let temp = TempDir::new().expect("temp dir");
    let cache = temp.path().join("cache");

    let source = ImageSource::from_url(&format!("{base}/images/cat.png")).expect("valid url");
    let result = source.fetch_with(&client(), &cache).await;

    assert!(matches!(result, Err(PixcatError::FileNotFound(_))));
    assert!(!cache.exists());
    assert_eq!(entries(&cache), 0);
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let base = serve("500 Internal Server Error", Vec::new()).await;
    let temp = TempDir::new().expect("temp dir");

    let source = ImageSource::from_url(&format!("{base}/cat.png")).expect("valid url");
    let result = source.fetch_with(&client(), temp.path()).await;

    assert!(matches!(result, Err(PixcatError::Network(_))));
    assert_eq!(entries(temp.path()), 0);
}

#[tokio::test]
async fn test_download_is_cached_by_last_segment() {
    let body = png_bytes();
    let base = serve("200 OK", body.clone()).await;
    let temp = TempDir::new().expect("temp dir");
    let cache = temp.path().join("nested").join("cache");

    let source = ImageSource::from_url(&format!("{base}/a/b/cat.png?v=2")).expect("valid url");
    let path = source.fetch_with(&client(), &cache).await.expect("download");

    assert_eq!(path, cache.join("cat.png"));
    assert_eq!(std::fs::read(&path).expect("cached file"), body);
    assert_eq!(entries(&cache), 1, "no partial file left behind");

    let mut image = TermImage::from_file(&path, Some(Size::new(3, 2))).expect("cached image");
    let mut out = Vec::new();
    image
        .draw(&mut out, std::future::pending())
        .await
        .expect("draw static image");

    let text = String::from_utf8(out).expect("utf-8 output");
    assert_eq!(
        text,
        "\x1b[38;2;200;100;50m\u{2584}\u{2584}\u{2584}\n\
         \x1b[38;2;200;100;50m\u{2584}\u{2584}\u{2584}\x1b[0m\n"
    );
}

#[test]
fn test_url_without_host_is_invalid_input() {
    assert!(matches!(
        ImageSource::from_url("file:///tmp/cat.png"),
        Err(PixcatError::InvalidInput(_))
    ));
}
