//! Sale records: storage, listing, search and loading from the seed dataset.

mod core;
mod initialize_endpoint;
mod listing;
mod query;
mod seed;

#[cfg(test)]
pub(crate) mod test_utils;

pub use self::core::{Sale, count_sales, create_sale_table, insert_sales};
pub use initialize_endpoint::initialize_endpoint;
pub use listing::{
    PAGE_COUNT_HEADER, PAGE_HEADER, PER_PAGE_HEADER, TOTAL_COUNT_HEADER, get_transactions_endpoint,
};
pub use query::{SaleFilter, SalePage, get_sales, get_sales_page};
pub use seed::{DEFAULT_SEED_URL, SeedSource, fetch_seed_records, seed_from_external_source};
