//! Dashboard module
//!
//! Provides a page showing one month of sales as a table, a statistics card
//! and charts of the price ranges and categories.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
