//! Helpers for setting up sale records in tests.

use rusqlite::Connection;

use crate::{db::initialize, sale::Sale};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

/// Create an unsold sale in the "misc" category.
pub(crate) fn sale(id: i64, title: &str, price: f64, date_of_sale: &str) -> Sale {
    Sale {
        id,
        title: title.to_owned(),
        price,
        description: format!("A description of {title}"),
        category: "misc".to_owned(),
        image: format!("https://example.com/{id}.jpg"),
        sold: false,
        date_of_sale: date_of_sale.to_owned(),
    }
}

/// A sale dated in March 2022.
pub(crate) fn march_sale(id: i64, price: f64, category: &str, sold: bool) -> Sale {
    Sale {
        category: category.to_owned(),
        sold,
        ..sale(id, &format!("Product {id}"), price, "2022-03-15T10:00:00+00:00")
    }
}
