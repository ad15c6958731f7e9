//! Defines the sale record model and its database table.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, db::read_count, month::parse_sale_month};

// ============================================================================
// MODELS
// ============================================================================

/// A product-sale record, i.e. a product that was listed for sale in a given month.
///
/// Records are inserted verbatim from the seed dataset and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// The ID given by the seed dataset.
    ///
    /// Not unique: seeding the database twice inserts every ID twice.
    pub id: i64,
    /// The product name.
    pub title: String,
    /// The listed price of the product.
    pub price: f64,
    /// A text description of the product.
    pub description: String,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// A URL to an image of the product.
    pub image: String,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the product was sold, as given by the seed dataset.
    ///
    /// Usually an RFC 3339 date-time such as "2021-11-27T20:29:54+05:30".
    pub date_of_sale: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns to select to build a [Sale] with [map_sale_row].
pub(crate) const SALE_COLUMNS: &str =
    "id, title, price, description, category, image, sold, date_of_sale";

/// Insert `sales` into the database in a single SQL transaction.
///
/// The month of each sale date is extracted and stored alongside the record
/// so that month filters do not need to parse dates at query time. Sales
/// with dates that cannot be parsed are still inserted, they just never
/// match a month filter.
///
/// Returns the number of records inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if any insert fails, in which case no records are inserted.
pub fn insert_sales(sales: &[Sale], connection: &Connection) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    {
        let mut statement = transaction.prepare(
            "INSERT INTO sale (id, title, price, description, category, image, sold, date_of_sale, sale_month)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for sale in sales {
            let sale_month = parse_sale_month(&sale.date_of_sale).map(|month| month as u8);

            if sale_month.is_none() {
                tracing::warn!(
                    "sale {} has an unrecognised date {:?} and will not match any month",
                    sale.id,
                    sale.date_of_sale
                );
            }

            statement.execute((
                sale.id,
                &sale.title,
                sale.price,
                &sale.description,
                &sale.category,
                &sale.image,
                sale.sold,
                &sale.date_of_sale,
                sale_month,
            ))?;
        }
    }

    transaction.commit()?;

    Ok(sales.len())
}

/// Get the total number of sale records in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_sales(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM sale", [], |row| read_count(row, 0))
        .map_err(|error| error.into())
}

/// Create the sale table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // `row_id` keeps listing order stable since the dataset `id` may repeat.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL,
                sale_month INTEGER CHECK (sale_month BETWEEN 1 AND 12)
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_month ON sale(sale_month);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [SALE_COLUMNS] to a [Sale].
pub(crate) fn map_sale_row(row: &Row) -> Result<Sale, rusqlite::Error> {
    Ok(Sale {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
