//! Sets up the application's SQLite database.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Row};

use crate::{Error, sale::create_sale_table};

/// Create the tables for the domain models if they do not already exist.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_sale_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// The guard must be dropped before the caller awaits anything.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Read the non-negative count in column `index` of `row`.
///
/// SQLite only stores signed integers, so counts are read as `i64` and
/// rejected if they are negative.
pub(crate) fn read_count(row: &Row, index: usize) -> rusqlite::Result<u64> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(index, count))
}
