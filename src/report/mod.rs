//! Aggregations over the sale records for a month.
//!
//! Each aggregation is a plain function over a database connection so that
//! the JSON endpoints, the combined report and the dashboard page all share
//! the same implementation.

mod category;
mod combined;
mod endpoints;
mod price_range;
mod statistics;

pub use category::{CategoryCount, get_category_counts};
pub use combined::{CombinedReport, get_combined_report};
pub use endpoints::{
    get_bar_chart_endpoint, get_combined_report_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
pub use price_range::{PriceRangeCount, get_price_ranges};
pub use statistics::{Statistics, get_statistics};

/// Restricts a query on the sale table to the month bound to `:month`.
const MONTH_CLAUSE: &str = "(:month IS NULL OR sale_month = :month)";
