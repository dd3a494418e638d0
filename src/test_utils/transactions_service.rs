use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::Value;
use tokio::net::TcpListener;

/// Serve a stand-in for the transactions service on an ephemeral localhost
/// port and return its base URL.
///
/// `GET /transactions` answers with `status` and `body`.
pub(crate) async fn serve_transactions(status: StatusCode, body: Value) -> String {
    let router = Router::new().route(
        "/transactions",
        get(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let address = listener.local_addr().expect("Could not get local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    format!("http://{address}")
}
