//! Minimal tsu-length example — routes with and without the Content-Length filter.
//!
//! Run with:
//!   RUST_LOG=tsu_length=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users/42      # content-length: 26
//!   curl -i http://localhost:3000/report        # content-length: 22, three frames
//!   curl -i http://localhost:3000/clock         # streamed, no content-length
//!   curl -i -X DELETE http://localhost:3000/users/42

use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;
use tsu_length::middleware::ContentLength;
use tsu_length::{Body, ContentType, Method, Request, Response, Router, Server, StatusCode};

#[tokio::main]
async fn main() -> Result<(), tsu_length::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .on(Method::GET,    "/users/{id}", ContentLength::new(get_user))
        .on(Method::GET,    "/report",     ContentLength::new(report))
        .on(Method::GET,    "/clock",      ContentLength::new(clock))
        .on(Method::DELETE, "/users/{id}", ContentLength::new(delete_user));

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// GET /report — a fixed sequence of rows; its length is the sum of the rows.
async fn report(_req: Request) -> Response {
    Response::builder().chunks(ContentType::Csv, ["id,name\n", "1,alice\n", "2,bob\n"])
}

// GET /clock — produced when sent, so the filter leaves it alone and hyper
// falls back to chunked encoding.
async fn clock(_req: Request) -> Response {
    Response::builder()
        .header("content-type", "text/plain")
        .body(Body::from_fn(|| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("{secs}\n")
        }))
}

// DELETE /users/{id} → 204 No Content, never a content-length
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
