//! The endpoint that loads the seed dataset into the database.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState,
    sale::seed::{SeedSource, seed_from_external_source},
};

/// The state needed to seed the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection to insert the seed records into.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to download the seed records from.
    pub seed_source: SeedSource,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_source: state.seed_source.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResponse {
    message: &'static str,
    inserted_count: usize,
}

/// A route handler that loads the seed dataset into the database.
///
/// Every call inserts the full dataset, so calling it twice duplicates the records.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Response {
    match seed_from_external_source(&state.seed_source, &state.db_connection).await {
        Ok(inserted_count) => Json(InitializeResponse {
            message: "Database initialized with seed data!",
            inserted_count,
        })
        .into_response(),
        Err(error) => error.into_json_response("Error initializing database"),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{Json, Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        sale::{
            SeedSource, count_sales,
            initialize_endpoint::{SeedState, initialize_endpoint},
            test_utils::get_test_connection,
        },
    };

    async fn serve_seed(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/seed.json")
    }

    fn get_test_server(seed_url: &str) -> (TestServer, SeedState) {
        let state = SeedState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            seed_source: SeedSource::new(seed_url, Duration::from_secs(5)).unwrap(),
        };
        let app = Router::new()
            .route(endpoints::INITIALIZE, get(initialize_endpoint))
            .with_state(state.clone());

        (
            TestServer::new(app),
            state,
        )
    }

    #[tokio::test]
    async fn responds_with_inserted_count() {
        let seed_url = serve_seed(Router::new().route(
            "/seed.json",
            get(|| async {
                Json(json!([{
                    "id": 1,
                    "title": "Shirt",
                    "price": 50.0,
                    "description": "A cotton shirt",
                    "category": "men's clothing",
                    "image": "https://example.com/1.jpg",
                    "sold": true,
                    "dateOfSale": "2022-03-01T10:00:00+05:30"
                }]))
            }),
        ))
        .await;
        let (server, state) = get_test_server(&seed_url);

        let response = server.get(endpoints::INITIALIZE).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Database initialized with seed data!",
            "insertedCount": 1
        }));
        assert_eq!(count_sales(&state.db_connection.lock().unwrap()).unwrap(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_server_error() {
        let seed_url = serve_seed(Router::new().route(
            "/seed.json",
            get(|| async { StatusCode::NOT_FOUND }),
        ))
        .await;
        let (server, _) = get_test_server(&seed_url);

        let response = server.get(endpoints::INITIALIZE).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Error initializing database");
    }
}
