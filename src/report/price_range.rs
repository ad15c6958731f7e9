//! The price histogram.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, db::read_count, month::MonthFilter, report::MONTH_CLAUSE};

/// The width of each price bucket.
const BUCKET_WIDTH: u32 = 100;
/// The index of the open-ended bucket that holds every price from 900 up.
const LAST_BUCKET: u32 = 9;

/// The number of records whose price falls in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeCount {
    /// The price range of the bucket, e.g. "100 - 200".
    pub bucket_label: String,
    /// The number of records in the bucket.
    pub count: u64,
}

/// Count the records matching `month` in each price bucket.
///
/// The buckets are `[0, 100)`, `[100, 200)`, ..., `[800, 900)` and `[900, ∞)`.
/// Negative prices are counted in the first bucket. Buckets are listed in
/// ascending price order and empty buckets are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_price_ranges(
    month: MonthFilter,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let query = format!(
        "SELECT MIN(MAX(CAST(price / {BUCKET_WIDTH} AS INTEGER), 0), {LAST_BUCKET}) AS bucket,
            COUNT(*)
        FROM sale WHERE {MONTH_CLAUSE}
        GROUP BY bucket
        ORDER BY bucket ASC"
    );

    connection
        .prepare(&query)?
        .query_map(&[(":month", &month.sql_value())], |row| {
            Ok(PriceRangeCount {
                bucket_label: bucket_label(row.get(0)?),
                count: read_count(row, 1)?,
            })
        })?
        .collect::<Result<Vec<PriceRangeCount>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

fn bucket_label(bucket: u32) -> String {
    if bucket >= LAST_BUCKET {
        format!("{} and above", LAST_BUCKET * BUCKET_WIDTH + 1)
    } else {
        let lower = bucket * BUCKET_WIDTH;
        format!("{lower} - {}", lower + BUCKET_WIDTH)
    }
}
