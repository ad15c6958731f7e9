//! The number of records in each product category.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, db::read_count, month::MonthFilter, report::MONTH_CLAUSE};

/// The number of records in one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name, e.g. "electronics".
    pub category: String,
    /// The number of records in the category.
    pub count: u64,
}

/// Count the records matching `month` in each category.
///
/// Categories are ordered by count, largest first, with ties ordered by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_counts(
    month: MonthFilter,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let query = format!(
        "SELECT category, COUNT(*) AS count
        FROM sale WHERE {MONTH_CLAUSE}
        GROUP BY category
        ORDER BY count DESC, category ASC"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":month", &month.sql_value())], |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: read_count(row, 1)?,
            })
        })?
        .collect::<Result<Vec<CategoryCount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
