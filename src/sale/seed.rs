//! Loads the sale records from the external seed dataset.

use std::{sync::Mutex, time::Duration};

use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    sale::core::{Sale, insert_sales},
};

/// The dataset of product sales that the dashboard is built around.
pub const DEFAULT_SEED_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Where to download the seed dataset from.
#[derive(Debug, Clone)]
pub struct SeedSource {
    client: reqwest::Client,
    url: String,
}

impl SeedSource {
    /// Create a source that downloads a JSON array of sales from `url`.
    ///
    /// Requests that take longer than `timeout` are abandoned.
    ///
    /// # Errors
    /// Returns [Error::SeedFetchError] if the HTTP client cannot be created.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

/// Download the seed dataset.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the request fails, times out, returns a
/// non-success status, or the body is not a JSON array of sales.
pub async fn fetch_seed_records(source: &SeedSource) -> Result<Vec<Sale>, Error> {
    tracing::info!("Fetching seed data from {}", source.url);

    let sales = source
        .client
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Sale>>()
        .await?;

    tracing::debug!("Fetched {} sale records", sales.len());

    Ok(sales)
}

/// Download the seed dataset and insert every record into the database.
///
/// This is a one-time bootstrap operation: calling it again inserts every
/// record a second time.
///
/// Returns the number of records inserted.
///
/// # Errors
/// Returns [Error::SeedFetchError] if the dataset cannot be downloaded,
/// [Error::DatabaseLockError] if the database lock is poisoned,
/// or [Error::SqlError] if the records cannot be inserted.
pub async fn seed_from_external_source(
    source: &SeedSource,
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let sales = fetch_seed_records(source).await?;

    insert_seed_records(&sales, db_connection)
}

fn insert_seed_records(
    sales: &[Sale],
    db_connection: &Mutex<Connection>,
) -> Result<usize, Error> {
    let connection = lock_connection(db_connection)?;

    let inserted = insert_sales(sales, &connection)?;
    tracing::info!("Inserted {inserted} sale records from the seed dataset");

    Ok(inserted)
}
