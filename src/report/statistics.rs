//! The sale totals for a month.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, db::read_count, month::MonthFilter, report::MONTH_CLAUSE};

/// The sale totals for the records matching a month filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every matching record, sold or not.
    pub total_sale_amount: f64,
    /// The number of matching records that were sold.
    pub sold_items: u64,
    /// The number of matching records that were not sold.
    pub unsold_items: u64,
}

/// Calculate the sale totals for the records matching `month`.
///
/// A month with no records yields all zeros.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_statistics(month: MonthFilter, connection: &Connection) -> Result<Statistics, Error> {
    let query = format!(
        "SELECT
            COALESCE(SUM(price), 0.0),
            COALESCE(SUM(CASE WHEN sold THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN sold THEN 0 ELSE 1 END), 0)
        FROM sale WHERE {MONTH_CLAUSE}"
    );

    connection
        .prepare(&query)?
        .query_row(&[(":month", &month.sql_value())], |row| {
            Ok(Statistics {
                total_sale_amount: row.get(0)?,
                sold_items: read_count(row, 1)?,
                unsold_items: read_count(row, 2)?,
            })
        })
        .map_err(|error| error.into())
}
