//! End-to-end tests against a live server on an ephemeral port

use devserve::{Config, Server};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::{HeaderMap, HeaderName, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    root: TempDir,
    _shutdown: oneshot::Sender<()>,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

fn site() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>dev build</h1>").unwrap();
    std::fs::write(root.path().join("app.js"), "console.log('v2');").unwrap();
    std::fs::create_dir(root.path().join("assets")).unwrap();
    std::fs::write(root.path().join("assets/logo.svg"), "<svg></svg>").unwrap();
    root
}

fn test_config() -> Config {
    let mut config = Config::load_from("/nonexistent/devserve-config").unwrap();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.logging.access_log = false;
    config
}

fn start_server(root: TempDir) -> TestServer {
    start_server_with(root, |_| {})
}

fn start_server_with(root: TempDir, tweak: impl FnOnce(&mut Config)) -> TestServer {
    let mut config = test_config();
    config.files.root = Some(root.path().to_str().unwrap().to_string());
    tweak(&mut config);

    let server = Server::bind(config).unwrap();
    let addr = server.local_addr().unwrap();
    assert_eq!(server.root(), root.path().canonicalize().unwrap());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(server.run_until(async move {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        root,
        _shutdown: tx,
    }
}

async fn send(addr: SocketAddr, method: Method, path: &str) -> TestResponse {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(conn);

    let req = Request::builder()
        .method(method)
        .uri(path)
        .header("Host", addr.to_string())
        .body(Empty::<Bytes>::new())
        .unwrap();
    let response = sender.send_request(req).await.unwrap();
    let (parts, body) = response.into_parts();

    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body: body.collect().await.unwrap().to_bytes(),
    }
}

async fn get(addr: SocketAddr, path: &str) -> TestResponse {
    send(addr, Method::GET, path).await
}

fn header_values(headers: &HeaderMap, name: HeaderName) -> Vec<&str> {
    headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect()
}

fn assert_no_cache_headers(headers: &HeaderMap) {
    assert_eq!(
        header_values(headers, CACHE_CONTROL),
        vec!["no-cache, no-store, must-revalidate"]
    );
    assert_eq!(header_values(headers, PRAGMA), vec!["no-cache"]);
    assert_eq!(header_values(headers, EXPIRES), vec!["0"]);
}

#[tokio::test]
async fn missing_path_is_404_with_anti_cache_headers() {
    let server = start_server(site());

    let response = get(server.addr, "/nonexistent.html").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn root_serves_index_file() {
    let server = start_server(site());

    let response = get(server.addr, "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "<h1>dev build</h1>");
    assert_eq!(response.headers["content-type"], "text/html; charset=utf-8");
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn file_bytes_are_served_unmodified() {
    let server = start_server(site());
    let expected = std::fs::read(server.root.path().join("app.js")).unwrap();

    let response = get(server.addr, "/app.js").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, expected);
    assert!(response.headers.contains_key("last-modified"));
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn directory_without_index_is_listed() {
    let server = start_server(site());

    let response = get(server.addr, "/assets/").await;
    assert_eq!(response.status, StatusCode::OK);
    let html = std::str::from_utf8(&response.body).unwrap();
    assert!(html.contains("Directory listing for /assets/"));
    assert!(html.contains("href=\"logo.svg\""));
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn redirects_and_errors_carry_anti_cache_headers() {
    let server = start_server(site());

    let redirect = get(server.addr, "/assets").await;
    assert_eq!(redirect.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(redirect.headers["location"], "/assets/");
    assert_no_cache_headers(&redirect.headers);

    let unsupported = send(server.addr, Method::POST, "/index.html").await;
    assert_eq!(unsupported.status, StatusCode::NOT_IMPLEMENTED);
    assert_no_cache_headers(&unsupported.headers);

    let escape = get(server.addr, "/../../etc/passwd").await;
    assert_eq!(escape.status, StatusCode::NOT_FOUND);
    assert_no_cache_headers(&escape.headers);
}

#[tokio::test]
async fn head_returns_headers_only() {
    let server = start_server(site());

    let response = send(server.addr, Method::HEAD, "/app.js").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn byte_range_is_partial_content() {
    let server = start_server(site());

    let stream = TcpStream::connect(server.addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(conn);

    let req = Request::builder()
        .uri("/app.js")
        .header("Host", server.addr.to_string())
        .header("Range", "bytes=0-6")
        .body(Empty::<Bytes>::new())
        .unwrap();
    let response = sender.send_request(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_no_cache_headers(response.headers());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, "console");
}

#[tokio::test]
async fn leading_double_slash_redirect_stays_on_host() {
    let server = start_server(tempfile::tempdir().unwrap());

    let response = get(server.addr, "//evil.example/..").await;
    assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
    let location = response.headers["location"].to_str().unwrap();
    assert!(location.starts_with('/'));
    assert!(!location.starts_with("//"));
    assert_no_cache_headers(&response.headers);
}

#[tokio::test]
async fn slow_download_outlives_header_read_timeout() {
    let root = tempfile::tempdir().unwrap();
    let payload = vec![b'x'; 8 * 1024 * 1024];
    std::fs::write(root.path().join("big.bin"), &payload).unwrap();
    let server = start_server_with(root, |config| {
        config.performance.header_read_timeout = 1;
    });

    let stream = TcpStream::connect(server.addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(conn);

    let req = Request::builder()
        .uri("/big.bin")
        .header("Host", server.addr.to_string())
        .body(Empty::<Bytes>::new())
        .unwrap();
    let response = sender.send_request(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Stall the reader past the limit while the server is mid-write
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), payload.len());
}

#[tokio::test]
async fn default_root_is_program_directory() {
    let server = Server::bind(test_config()).unwrap();

    let exe_dir = std::env::current_exe()
        .unwrap()
        .canonicalize()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    assert_eq!(server.root(), exe_dir);
    assert_ne!(std::env::current_dir().unwrap().canonicalize().unwrap(), exe_dir);
}

#[tokio::test]
async fn configured_root_is_served_regardless_of_working_directory() {
    let root = site();
    let expected = root.path().canonicalize().unwrap();
    let server = start_server(root);

    assert!(expected.join("index.html").is_file());
    assert_ne!(std::env::current_dir().unwrap(), expected);
    let response = get(server.addr, "/index.html").await;
    assert_eq!(response.status, StatusCode::OK);
}
