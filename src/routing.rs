//! Application router configuration.

use std::path::PathBuf;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir};

use crate::{
    AppState, Error,
    dashboard::get_dashboard_page,
    endpoints,
    logging::logging_middleware,
    report::{
        get_bar_chart_endpoint, get_combined_report_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    sale::{
        PAGE_COUNT_HEADER, PAGE_HEADER, PER_PAGE_HEADER, TOTAL_COUNT_HEADER,
        get_transactions_endpoint, initialize_endpoint,
    },
};

/// The largest request body the server will read.
pub const REQUEST_BODY_LIMIT: usize = 16 * 1024;

/// Settings for the layers wrapped around the app's routes.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// The single origin allowed to make cross-origin requests, if any.
    pub allowed_origin: Option<HeaderValue>,
    /// The directory to serve static files from.
    pub public_dir: PathBuf,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            allowed_origin: None,
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Return a router with all the app's routes.
pub fn build_router(state: AppState, config: &RouterConfig) -> Router {
    let router = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INITIALIZE, get(initialize_endpoint))
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_REPORT, get(get_combined_report_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new(&config.public_dir))
        .fallback(get_404_not_found)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware));

    let router = match &config.allowed_origin {
        Some(origin) => router.layer(cors_layer(origin.clone())),
        None => router,
    };

    router.layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT))
}

/// Allow credentialed GET requests from `origin` and let it read the pagination headers.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_credentials(true)
        .expose_headers([
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderName::from_static(PAGE_HEADER),
            HeaderName::from_static(PER_PAGE_HEADER),
            HeaderName::from_static(PAGE_COUNT_HEADER),
        ])
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}


#[cfg(test)]
mod router_tests {
    use std::{path::PathBuf, time::Duration};

    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{
        AppState, endpoints,
        pagination::PaginationConfig,
        routing::{REQUEST_BODY_LIMIT, RouterConfig, build_router},
        sale::{SeedSource, insert_sales, test_utils::march_sale},
    };

    const ORIGIN: &str = "http://localhost:5173";

    fn get_test_server(config: RouterConfig) -> TestServer {
        let seed_source =
            SeedSource::new("http://127.0.0.1:9/seed.json", Duration::from_secs(1)).unwrap();
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            seed_source,
            PaginationConfig::default(),
        )
        .unwrap();
        insert_sales(
            &[
                march_sale(1, 50.0, "electronics", true),
                march_sale(2, 150.0, "books", false),
            ],
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        TestServer::new(build_router(state, &config))
    }

    fn cors_config() -> RouterConfig {
        RouterConfig {
            allowed_origin: Some(HeaderValue::from_static(ORIGIN)),
            public_dir: PathBuf::from("public"),
        }
    }

    #[tokio::test]
    async fn serves_every_json_endpoint() {
        let server = get_test_server(RouterConfig::default());

        for endpoint in [
            endpoints::TRANSACTIONS,
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED_REPORT,
        ] {
            let response = server.get(endpoint).add_query_param("month", "03").await;

            assert_eq!(
                response.status_code(),
                StatusCode::OK,
                "unexpected status from {endpoint}"
            );
        }
    }

    #[tokio::test]
    async fn serves_dashboard() {
        let server = get_test_server(RouterConfig::default());

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Transaction Dashboard"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server(RouterConfig::default());

        let response = server.get("/no-such-route").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Not found");
    }

    #[tokio::test]
    async fn allows_configured_origin() {
        let server = get_test_server(cors_config());

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "03")
            .add_header(header::ORIGIN, HeaderValue::from_static(ORIGIN))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), ORIGIN);
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            "true"
        );
        let exposed = response.header(header::ACCESS_CONTROL_EXPOSE_HEADERS);
        assert!(
            exposed.to_str().unwrap().contains("x-total-count"),
            "got {exposed:?}"
        );
    }

    #[tokio::test]
    async fn other_origins_only_see_the_configured_origin() {
        let server = get_test_server(cors_config());
        let other_origin = "http://evil.example";

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "03")
            .add_header(header::ORIGIN, HeaderValue::from_static(other_origin))
            .await;

        response.assert_status_ok();
        let allowed = response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        assert_eq!(allowed, ORIGIN);
        assert_ne!(allowed, other_origin);
    }

    #[tokio::test]
    async fn no_cors_headers_without_configured_origin() {
        let server = get_test_server(RouterConfig::default());

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "03")
            .add_header(header::ORIGIN, HeaderValue::from_static(ORIGIN))
            .await;

        assert!(
            response
                .maybe_header(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn rejects_large_body_with_content_length() {
        let server = get_test_server(RouterConfig::default());
        let body = "x".repeat(REQUEST_BODY_LIMIT + 1);

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "03")
            .add_header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
            .text(body)
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn rejects_large_body_without_content_length() {
        let server = get_test_server(RouterConfig::default());

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "03")
            .text("x".repeat(REQUEST_BODY_LIMIT + 1))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn accepts_body_within_limit() {
        let server = get_test_server(RouterConfig::default());

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "03")
            .text("x".repeat(REQUEST_BODY_LIMIT))
            .await;

        response.assert_status_ok();
    }
}
