//! Application router configuration.

use axum::{Router, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{AppState, endpoints, test_utils::serve_transactions};

    use super::{build_router, get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    async fn get_test_server() -> TestServer {
        let base_url = serve_transactions(
            StatusCode::OK,
            json!({
                "transactions": [{
                    "id": "1",
                    "title": "Salary",
                    "type": "income",
                    "value": 5000,
                    "category": { "id": "c1", "title": "Salary" },
                    "created_at": "2020-05-10"
                }],
                "balance": { "income": "5000", "outcome": "0", "total": "5000" }
            }),
        )
        .await;
        let state = AppState::new(&base_url, None).expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_dashboard() {
        let server = get_test_server().await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("R$ 5.000,00"), "balance missing from {text}");
        assert!(text.contains("10/05/2020"), "date missing from {text}");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server().await;

        server
            .get("/transactions/import")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn error_page_has_500_status() {
        let server = get_test_server().await;

        server
            .get(endpoints::INTERNAL_ERROR_VIEW)
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
