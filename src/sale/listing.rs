//! Defines the route handler for listing and searching sales as JSON.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    month::MonthFilter,
    pagination::{PageRequest, PaginationConfig},
    sale::query::{SaleFilter, SalePage, get_sales_page},
};

/// The header holding the number of sales matching the filter across all pages.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
/// The header holding the page number of the response.
pub const PAGE_HEADER: &str = "x-page";
/// The header holding the page size used for the response.
pub const PER_PAGE_HEADER: &str = "x-per-page";
/// The header holding the number of pages matching the filter.
pub const PAGE_COUNT_HEADER: &str = "x-page-count";

/// The state needed to list sales.
#[derive(Debug, Clone)]
pub struct SaleListingState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for SaleListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The raw query parameters for listing sales.
///
/// Values are kept as strings so that invalid values produce the crate's own
/// error response rather than axum's query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsParams {
    month: Option<String>,
    search: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

/// A route handler that responds with one page of the sales for a month as a
/// JSON array, with the pagination details in the response headers.
pub async fn get_transactions_endpoint(
    State(state): State<SaleListingState>,
    Query(params): Query<TransactionsParams>,
) -> Response {
    match list_sales(&state, &params) {
        Ok(page) => (pagination_headers(&page), Json(page.sales)).into_response(),
        Err(error) => error.into_json_response("Error fetching transactions"),
    }
}

fn list_sales(state: &SaleListingState, params: &TransactionsParams) -> Result<SalePage, Error> {
    let month = MonthFilter::from_required_param(params.month.as_deref())?;
    let page_request = PageRequest::from_params(
        params.page.as_deref(),
        params.per_page.as_deref(),
        &state.pagination_config,
    )?;
    let filter = SaleFilter::new(month, params.search.as_deref());

    let connection = lock_connection(&state.db_connection)?;

    get_sales_page(&filter, page_request, &connection)
}

fn pagination_headers(page: &SalePage) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in [
        (TOTAL_COUNT_HEADER, page.total_count),
        (PAGE_HEADER, page.page),
        (PER_PAGE_HEADER, page.per_page),
        (PAGE_COUNT_HEADER, page.page_count),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }

    headers
}
