//! Route handlers that serve the aggregations as JSON.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::lock_connection,
    month::MonthFilter,
    report::{
        CombinedReport, Statistics, get_category_counts, get_combined_report, get_price_ranges,
        get_statistics,
    },
    sale::SaleFilter,
};

/// The state needed to compute reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw query parameters for the report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    month: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatisticsResponse {
    #[serde(flatten)]
    statistics: Statistics,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ChartResponse<T> {
    data: Vec<T>,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct CombinedReportResponse {
    #[serde(flatten)]
    report: CombinedReport,
    message: &'static str,
}

/// A route handler that responds with the sale totals for a month.
///
/// The month is required.
pub async fn get_statistics_endpoint(
    State(state): State<ReportState>,
    Query(params): Query<ReportParams>,
) -> Response {
    let result = MonthFilter::from_required_param(params.month.as_deref()).and_then(|month| {
        let connection = lock_connection(&state.db_connection)?;
        get_statistics(month, &connection)
    });

    match result {
        Ok(statistics) => Json(StatisticsResponse {
            statistics,
            message: "Statistics fetched successfully.",
        })
        .into_response(),
        Err(error) => error.into_json_response("Error fetching statistics"),
    }
}

/// A route handler that responds with the price histogram.
///
/// Without a month, every record is counted.
pub async fn get_bar_chart_endpoint(
    State(state): State<ReportState>,
    Query(params): Query<ReportParams>,
) -> Response {
    let result = MonthFilter::from_optional_param(params.month.as_deref()).and_then(|month| {
        let connection = lock_connection(&state.db_connection)?;
        get_price_ranges(month, &connection)
    });

    match result {
        Ok(data) => Json(ChartResponse {
            data,
            message: "Bar chart data fetched successfully.",
        })
        .into_response(),
        Err(error) => error.into_json_response("Error fetching bar chart data"),
    }
}

/// A route handler that responds with the category breakdown.
///
/// Without a month, every record is counted.
pub async fn get_pie_chart_endpoint(
    State(state): State<ReportState>,
    Query(params): Query<ReportParams>,
) -> Response {
    let result = MonthFilter::from_optional_param(params.month.as_deref()).and_then(|month| {
        let connection = lock_connection(&state.db_connection)?;
        get_category_counts(month, &connection)
    });

    match result {
        Ok(data) => Json(ChartResponse {
            data,
            message: "Pie chart data fetched successfully.",
        })
        .into_response(),
        Err(error) => error.into_json_response("Error fetching pie chart data"),
    }
}

/// A route handler that responds with the transactions, totals, histogram and
/// category breakdown for a month in one body.
pub async fn get_combined_report_endpoint(
    State(state): State<ReportState>,
    Query(params): Query<ReportParams>,
) -> Response {
    match combined_report(&state, &params) {
        Ok(report) => Json(CombinedReportResponse {
            report,
            message: "Combined report fetched successfully.",
        })
        .into_response(),
        Err(error) => error.into_json_response("Error fetching combined report"),
    }
}

fn combined_report(state: &ReportState, params: &ReportParams) -> Result<CombinedReport, Error> {
    let month = MonthFilter::from_required_param(params.month.as_deref())?;
    let filter = SaleFilter::new(month, params.search.as_deref());
    let connection = lock_connection(&state.db_connection)?;

    get_combined_report(&filter, &connection)
}
