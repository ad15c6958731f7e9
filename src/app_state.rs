//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig, sale::SeedSource};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where the initialize endpoint downloads the seed dataset from.
    pub seed_source: SeedSource,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the sale table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_source: SeedSource,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            seed_source,
            pagination_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
