//! A single report holding the listing and every aggregation for a month.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    report::{
        CategoryCount, PriceRangeCount, Statistics, get_category_counts, get_price_ranges,
        get_statistics,
    },
    sale::{Sale, SaleFilter, get_sales},
};

/// Every view of one month's sales in a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Every sale matching the filter, unpaginated and ordered by dataset ID.
    pub transactions: Vec<Sale>,
    /// The sale totals for the month.
    pub statistics: Statistics,
    /// The price histogram for the month.
    pub price_range: Vec<PriceRangeCount>,
    /// The category breakdown for the month.
    pub categories: Vec<CategoryCount>,
}

/// Build the combined report for `filter`.
///
/// The search term only narrows the transaction list. The aggregations always
/// cover every sale in the month so that they match the individual endpoints.
///
/// `connection` should stay locked for the whole call so the four parts are
/// read from the same snapshot.
///
/// # Errors
/// Returns [Error::SqlError] if any of the queries fail.
pub fn get_combined_report(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<CombinedReport, Error> {
    Ok(CombinedReport {
        transactions: get_sales(filter, connection)?,
        statistics: get_statistics(filter.month, connection)?,
        price_range: get_price_ranges(filter.month, connection)?,
        categories: get_category_counts(filter.month, connection)?,
    })
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        month::MonthFilter,
        report::{
            CombinedReport, get_category_counts, get_combined_report, get_price_ranges,
            get_statistics,
        },
        sale::{
            SaleFilter, get_sales, insert_sales,
            test_utils::{get_test_connection, march_sale, sale},
        },
    };

    const MARCH: MonthFilter = MonthFilter::Only(Month::March);

    #[test]
    fn matches_individual_aggregations() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale(1, 50.0, "electronics", true),
                march_sale(2, 150.0, "books", false),
                march_sale(3, 920.0, "electronics", false),
                sale(4, "April", 10.0, "2022-04-01T00:00:00Z"),
            ],
            &conn,
        )
        .unwrap();
        let filter = SaleFilter::new(MARCH, None);

        let got = get_combined_report(&filter, &conn).unwrap();

        assert_eq!(
            got,
            CombinedReport {
                transactions: get_sales(&filter, &conn).unwrap(),
                statistics: get_statistics(MARCH, &conn).unwrap(),
                price_range: get_price_ranges(MARCH, &conn).unwrap(),
                categories: get_category_counts(MARCH, &conn).unwrap(),
            }
        );
        assert_eq!(got.transactions.len(), 3);
    }

    #[test]
    fn search_narrows_transactions_only() {
        let conn = get_test_connection();
        let mut phone = march_sale(1, 500.0, "electronics", true);
        phone.title = "Phone".to_owned();
        insert_sales(&[phone, march_sale(2, 20.0, "books", false)], &conn).unwrap();

        let got = get_combined_report(&SaleFilter::new(MARCH, Some("phone")), &conn).unwrap();

        assert_eq!(got.transactions.len(), 1);
        assert_eq!(got.transactions[0].title, "Phone");
        assert_eq!(got.statistics.sold_items + got.statistics.unsold_items, 2);
        assert_eq!(got.categories.len(), 2);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let conn = get_test_connection();

        let got = get_combined_report(&SaleFilter::new(MARCH, None), &conn).unwrap();
        let json = serde_json::to_value(got).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "transactions": [],
                "statistics": {"totalSaleAmount": 0.0, "soldItems": 0, "unsoldItems": 0},
                "priceRange": [],
                "categories": []
            })
        );
    }
}
