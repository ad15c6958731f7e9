//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page with the table, statistics and charts for a month.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route that loads the seed dataset into the database.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing and searching the sales of a month.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sale totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the category breakdown.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for the transactions, totals, histogram and category breakdown in one response.
pub const COMBINED_REPORT: &str = "/combined-report";
