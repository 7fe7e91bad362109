//! Responses as hyper writes them, read back over a real socket.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tsu_length::middleware::ContentLength;
use tsu_length::{Body, ContentType, Error, Method, Request, Response, Router, Server};

async fn report(_req: Request) -> Response {
    Response::builder().chunks(ContentType::Csv, ["id,name\n", "1,alice\n", "2,bob\n"])
}

async fn clock(_req: Request) -> Response {
    Response::builder().body(Body::from_fn(|| "12:00"))
}

async fn echo(req: Request) -> Response {
    Response::text(format!("{} {}", req.param("id").unwrap_or("-"), String::from_utf8_lossy(req.body())))
}

struct Running {
    addr: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), Error>>,
}

async fn start() -> Running {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tsu_length=debug")
        .with_test_writer()
        .try_init();

    let app = Router::new()
        .on(Method::GET, "/report", ContentLength::new(report))
        .on(Method::GET, "/report/raw", report)
        .on(Method::GET, "/clock", ContentLength::new(clock))
        .on(Method::POST, "/users/{id}", ContentLength::new(echo));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel();
    let task = tokio::spawn(Server::serve_until(listener, app, async {
        let _ = stopped.await;
    }));

    Running { addr, stop, task }
}

/// Sends one request with `Connection: close` and returns the raw response.
async fn send(addr: std::net::SocketAddr, head: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{head} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8(raw).unwrap()
}

fn header<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let (head, _) = raw.split_once("\r\n\r\n")?;
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
}

fn payload(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map_or("", |(_, body)| body)
}

#[tokio::test]
async fn filtered_chunks_go_out_with_declared_length() {
    let server = start().await;

    let raw = send(server.addr, "GET /report", "").await;
    assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "{raw}");
    assert_eq!(header(&raw, "content-length"), Some("22"));
    assert_eq!(header(&raw, "transfer-encoding"), None);
    assert_eq!(header(&raw, "content-type"), Some("text/csv"));
    assert_eq!(payload(&raw), "id,name\n1,alice\n2,bob\n");

    let _ = server.stop.send(());
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unfiltered_chunks_go_out_chunked() {
    let server = start().await;

    let raw = send(server.addr, "GET /report/raw", "").await;
    assert_eq!(header(&raw, "content-length"), None);
    assert_eq!(header(&raw, "transfer-encoding"), Some("chunked"));

    let _ = server.stop.send(());
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn produced_body_goes_out_chunked_through_filter() {
    let server = start().await;

    let raw = send(server.addr, "GET /clock", "").await;
    assert_eq!(header(&raw, "content-length"), None);
    assert_eq!(header(&raw, "transfer-encoding"), Some("chunked"));
    assert!(payload(&raw).contains("12:00"), "{raw}");

    let _ = server.stop.send(());
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn request_body_and_params_reach_the_handler() {
    let server = start().await;

    let raw = send(server.addr, "POST /users/42", "alice").await;
    assert_eq!(header(&raw, "content-length"), Some("8"));
    assert_eq!(payload(&raw), "42 alice");

    let _ = server.stop.send(());
    server.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn unrouted_requests_get_not_found() {
    let server = start().await;

    let raw = send(server.addr, "GET /missing", "").await;
    assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"), "{raw}");

    let raw = send(server.addr, "DELETE /report", "").await;
    assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"), "{raw}");

    let _ = server.stop.send(());
    server.task.await.unwrap().unwrap();
}
