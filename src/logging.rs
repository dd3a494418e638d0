//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = read_body(body).await;
    log_body("Received request", &parts, &String::from_utf8_lossy(&body));

    let response = next.run(Request::from_parts(parts, body.into())).await;

    let (parts, body) = response.into_parts();
    let body = read_body(body).await;
    log_body("Sending response", &parts, &String::from_utf8_lossy(&body));

    Response::from_parts(parts, body.into())
}

async fn read_body(body: Body) -> Bytes {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::warn!("could not read body for logging: {error}"))
        .unwrap_or_default()
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &str) {
    tracing::info!("{message}: {parts:#?}\nbody: {}", quote_body(body));

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full body: {body:?}");
    }
}

/// Quote `body` for the `info` log, truncating it to [LOG_BODY_LENGTH_LIMIT].
fn quote_body(body: &str) -> String {
    let truncated = truncate(body, LOG_BODY_LENGTH_LIMIT);

    if truncated.len() < body.len() {
        format!("{truncated:?}...")
    } else {
        format!("{body:?}")
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
