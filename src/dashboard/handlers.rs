//! Dashboard HTTP handler and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard for a month
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    dashboard::{
        cards::{statistics_card, widget_error},
        charts::{
            DashboardChart, ECHARTS_SCRIPT_URL, category_chart, charts_script, price_range_chart,
        },
        tables::transactions_table,
    },
    db::lock_connection,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, error_view,
    },
    month::{MONTHS, MonthFilter},
    pagination::{PageRequest, PaginationConfig},
    report::{
        CategoryCount, PriceRangeCount, Statistics, get_category_counts, get_price_ranges,
        get_statistics,
    },
    sale::{SaleFilter, SalePage, get_sales_page},
};

/// The month shown when the request does not pick one.
const DEFAULT_MONTH: Month = Month::March;

const PRICE_RANGE_CHART_ID: &str = "price-range-chart";
const CATEGORY_CHART_ID: &str = "category-chart";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the table page size and pagination bar.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The raw query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    month: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

/// The query string for a dashboard link.
#[derive(Debug, Serialize)]
struct DashboardQuery<'a> {
    month: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    page: u64,
}

/// The data for each widget on the dashboard.
///
/// Each widget is loaded on its own so that one failed query does not stop
/// the others from being displayed.
struct DashboardData {
    sales: Result<SalePage, Error>,
    statistics: Result<Statistics, Error>,
    price_ranges: Result<Vec<PriceRangeCount>, Error>,
    categories: Result<Vec<CategoryCount>, Error>,
}

/// Display the transaction table, statistics and charts for a month.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(params): Query<DashboardParams>,
) -> Response {
    let (month, page_request) = match parse_params(&params, &state.pagination_config) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!("Invalid dashboard request: {error}");
            return (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "The dashboard could not understand the request.",
                    &error.to_string(),
                ),
            )
                .into_response();
        }
    };

    let filter = SaleFilter::new(MonthFilter::Only(month), params.search.as_deref());

    let data = match lock_connection(&state.db_connection) {
        Ok(connection) => load_dashboard_data(&filter, page_request, &connection),
        Err(error) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_view(
                    "Internal Server Error",
                    "500",
                    "Sorry, something went wrong.",
                    &error.to_string(),
                ),
            )
                .into_response();
        }
    };

    dashboard_view(month, &filter, &data, state.pagination_config.max_pages).into_response()
}

fn parse_params(
    params: &DashboardParams,
    config: &PaginationConfig,
) -> Result<(Month, PageRequest), Error> {
    let month = match MonthFilter::from_optional_param(params.month.as_deref())? {
        MonthFilter::Only(month) => month,
        MonthFilter::All => DEFAULT_MONTH,
    };

    let page = PageRequest::from_params(params.page.as_deref(), None, config)?.page;

    Ok((
        month,
        PageRequest {
            page,
            per_page: config.dashboard_page_size,
        },
    ))
}

fn load_dashboard_data(
    filter: &SaleFilter,
    page_request: PageRequest,
    connection: &Connection,
) -> DashboardData {
    DashboardData {
        sales: get_sales_page(filter, page_request, connection)
            .inspect_err(|error| tracing::error!("could not get sales page: {error}")),
        statistics: get_statistics(filter.month, connection)
            .inspect_err(|error| tracing::error!("could not get statistics: {error}")),
        price_ranges: get_price_ranges(filter.month, connection)
            .inspect_err(|error| tracing::error!("could not get price ranges: {error}")),
        categories: get_category_counts(filter.month, connection)
            .inspect_err(|error| tracing::error!("could not get category counts: {error}")),
    }
}

/// The URL of the dashboard for `month` and `search` at `page`.
fn dashboard_url(month: Month, search: Option<&str>, page: u64) -> String {
    let month_code = format!("{:02}", month as u8);
    let query = DashboardQuery {
        month: &month_code,
        search,
        page,
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query) => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
        Err(error) => {
            tracing::error!("could not encode dashboard query {query:?}: {error}");
            endpoints::DASHBOARD_VIEW.to_owned()
        }
    }
}

/// Renders the dashboard page.
fn dashboard_view(
    month: Month,
    filter: &SaleFilter,
    data: &DashboardData,
    max_pages: u64,
) -> Markup {
    let month_name = month.to_string();
    let search = filter.search.as_deref();

    let mut charts = Vec::new();
    if let Ok(price_ranges) = &data.price_ranges
        && !price_ranges.is_empty()
    {
        charts.push(DashboardChart {
            id: PRICE_RANGE_CHART_ID,
            options: price_range_chart(&month_name, price_ranges).to_string(),
        });
    }
    if let Ok(categories) = &data.categories
        && !categories.is_empty()
    {
        charts.push(DashboardChart {
            id: CATEGORY_CHART_ID,
            options: category_chart(&month_name, categories).to_string(),
        });
    }

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Transaction Dashboard" }

            (filter_form(month, search))

            section class="w-full max-w-screen-xl mb-8"
            {
                @match &data.sales {
                    Ok(page) => {
                        (transactions_table(page, max_pages, |page_number| {
                            dashboard_url(month, search, page_number)
                        }))
                    }
                    Err(_) => {
                        (widget_error("transactions-error", "Could not load the transactions."))
                    }
                }
            }

            section class="grid grid-cols-1 xl:grid-cols-3 gap-4 w-full max-w-screen-xl"
            {
                @match &data.statistics {
                    Ok(statistics) => { (statistics_card(&month_name, statistics)) }
                    Err(_) => { (widget_error("statistics-error", "Could not load the statistics.")) }
                }

                (chart_container(PRICE_RANGE_CHART_ID, &data.price_ranges, &month_name))
                (chart_container(CATEGORY_CHART_ID, &data.categories, &month_name))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn filter_form(selected_month: Month, search: Option<&str>) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex flex-wrap items-end gap-4 w-full max-w-screen-xl mb-6"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month in MONTHS {
                        option
                            value=(format!("{:02}", month as u8))
                            selected[month == selected_month]
                        {
                            (month.to_string())
                        }
                    }
                }
            }

            div class="grow"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }

                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Search title, description or price"
                    value=(search.unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    )
}

/// Renders the container for a chart, or a message if there is nothing to plot.
fn chart_container<T>(id: &str, data: &Result<Vec<T>, Error>, month_name: &str) -> Markup {
    match data {
        Ok(data) if data.is_empty() => html!(
            div id=(id) class=(CARD_STYLE)
            {
                p { "No items listed in " (month_name) "." }
            }
        ),
        Ok(_) => html!(
            div id=(id) class={ "chart-container " (CARD_STYLE) } {}
        ),
        Err(_) => widget_error(id, "Could not load the chart data."),
    }
}
