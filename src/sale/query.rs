//! Database queries for listing and searching sale records.

use rusqlite::{Connection, ToSql};

use crate::{
    Error,
    db::read_count,
    month::MonthFilter,
    pagination::PageRequest,
    sale::core::{SALE_COLUMNS, Sale, map_sale_row},
};

/// The criteria a sale record must meet to be listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleFilter {
    /// Only list sales from this month.
    pub month: MonthFilter,
    /// Only list sales whose title or description contains this text,
    /// ignoring ASCII case.
    ///
    /// If the text is a number, sales whose price equals that number are
    /// listed as well.
    pub search: Option<String>,
}

impl SaleFilter {
    /// Create a filter for `month` with an optional search term.
    ///
    /// A blank search term is treated as no search term.
    pub fn new(month: MonthFilter, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_owned);

        Self { month, search }
    }
}

/// One page of the sales matching a [SaleFilter].
#[derive(Debug, Clone, PartialEq)]
pub struct SalePage {
    /// The sales on this page, ordered by dataset ID.
    pub sales: Vec<Sale>,
    /// The 1-indexed page number.
    pub page: u64,
    /// The maximum number of sales on a page.
    pub per_page: u64,
    /// The number of sales matching the filter across all pages.
    pub total_count: u64,
    /// The number of pages needed to show every matching sale.
    pub page_count: u64,
}

// Month is matched on the integer month stored at insert time. The search
// pattern is bound with LIKE wildcards already added and escaped.
const FILTER_CLAUSE: &str = "WHERE (:month IS NULL OR sale_month = :month)
    AND (
        :pattern IS NULL
        OR title LIKE :pattern ESCAPE '\\'
        OR description LIKE :pattern ESCAPE '\\'
        OR (:price IS NOT NULL AND price = :price)
    )";

/// The SQL parameter values derived from a [SaleFilter].
struct FilterParams {
    month: Option<u8>,
    pattern: Option<String>,
    price: Option<f64>,
}

impl FilterParams {
    fn new(filter: &SaleFilter) -> Self {
        let search = filter.search.as_deref();

        Self {
            month: filter.month.sql_value(),
            pattern: search.map(|search| format!("%{}%", escape_like(search))),
            price: search
                .and_then(|search| search.parse::<f64>().ok())
                .filter(|price| price.is_finite()),
        }
    }

    fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        vec![
            (":month", &self.month as &dyn ToSql),
            (":pattern", &self.pattern as &dyn ToSql),
            (":price", &self.price as &dyn ToSql),
        ]
    }
}

/// Escape the LIKE wildcards in `text` so that it is matched literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Get one page of the sales matching `filter`.
///
/// Requesting a page past the last page returns an empty page rather than an error.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Sale row mapping fails
pub fn get_sales_page(
    filter: &SaleFilter,
    page_request: PageRequest,
    connection: &Connection,
) -> Result<SalePage, Error> {
    let params = FilterParams::new(filter);
    let total_count = count_matching_sales(&params, connection)?;

    // SQLite integers are signed, larger offsets are past the end anyway.
    let limit = i64::try_from(page_request.per_page).unwrap_or(i64::MAX);
    let offset = i64::try_from(page_request.offset()).unwrap_or(i64::MAX);

    let mut named_params = params.named_params();
    named_params.push((":limit", &limit as &dyn ToSql));
    named_params.push((":offset", &offset as &dyn ToSql));

    let query = format!(
        "SELECT {SALE_COLUMNS} FROM sale {FILTER_CLAUSE}
        ORDER BY id ASC, row_id ASC
        LIMIT :limit OFFSET :offset"
    );

    let sales = connection
        .prepare(&query)?
        .query_map(named_params.as_slice(), map_sale_row)?
        .collect::<Result<Vec<Sale>, rusqlite::Error>>()?;

    Ok(SalePage {
        sales,
        page: page_request.page,
        per_page: page_request.per_page,
        total_count,
        page_count: page_request.page_count(total_count),
    })
}

/// Get every sale matching `filter`, ordered by dataset ID.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Sale row mapping fails
pub fn get_sales(filter: &SaleFilter, connection: &Connection) -> Result<Vec<Sale>, Error> {
    let params = FilterParams::new(filter);
    let query =
        format!("SELECT {SALE_COLUMNS} FROM sale {FILTER_CLAUSE} ORDER BY id ASC, row_id ASC");

    connection
        .prepare(&query)?
        .query_map(params.named_params().as_slice(), map_sale_row)?
        .collect::<Result<Vec<Sale>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

fn count_matching_sales(params: &FilterParams, connection: &Connection) -> Result<u64, Error> {
    let query = format!("SELECT COUNT(*) FROM sale {FILTER_CLAUSE}");

    connection
        .prepare(&query)?
        .query_row(params.named_params().as_slice(), |row| {
            read_count(row, 0)
        })
        .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        month::MonthFilter,
        pagination::PageRequest,
        sale::{
            Sale, SaleFilter, get_sales, get_sales_page, insert_sales,
            query::escape_like,
            test_utils::{get_test_connection, march_sale, sale},
        },
    };

    const MARCH: MonthFilter = MonthFilter::Only(Month::March);

    fn titles(sales: &[Sale]) -> Vec<&str> {
        sales.iter().map(|sale| sale.title.as_str()).collect()
    }

    fn page(page: u64, per_page: u64) -> PageRequest {
        PageRequest { page, per_page }
    }

    #[test]
    fn paginates_matching_sales() {
        let conn = get_test_connection();
        let sales: Vec<Sale> = (1..=7)
            .map(|id| march_sale(id, 10.0 * id as f64, "misc", false))
            .collect();
        insert_sales(&sales, &conn).unwrap();
        let filter = SaleFilter::new(MARCH, None);

        let first = get_sales_page(&filter, page(1, 5), &conn).unwrap();
        let second = get_sales_page(&filter, page(2, 5), &conn).unwrap();

        assert_eq!(first.sales, sales[..5]);
        assert_eq!(second.sales, sales[5..]);
        assert_eq!(first.total_count, 7);
        assert_eq!(first.page_count, 2);
        assert_eq!(second.page, 2);
        assert_eq!(second.per_page, 5);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let conn = get_test_connection();
        insert_sales(&[march_sale(1, 10.0, "misc", false)], &conn).unwrap();
        let filter = SaleFilter::new(MARCH, None);

        let got = get_sales_page(&filter, page(3, 5), &conn).unwrap();
        let huge = get_sales_page(&filter, page(u64::MAX, 100), &conn).unwrap();

        assert!(got.sales.is_empty());
        assert_eq!(got.total_count, 1);
        assert!(huge.sales.is_empty());
    }

    #[test]
    fn filters_by_month() {
        let conn = get_test_connection();
        insert_sales(
            &[
                sale(1, "March", 10.0, "2022-03-01T00:00:00Z"),
                sale(2, "April", 10.0, "2022-04-01T00:00:00Z"),
                sale(3, "Also March", 10.0, "2021-03-31T23:00:00+05:30"),
                sale(4, "Undated", 10.0, "sometime"),
            ],
            &conn,
        )
        .unwrap();

        let march = get_sales(&SaleFilter::new(MARCH, None), &conn).unwrap();
        let all = get_sales(&SaleFilter::new(MonthFilter::All, None), &conn).unwrap();

        assert_eq!(titles(&march), ["March", "Also March"]);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn search_matches_title_ignoring_case() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale_titled(1, "Shirt", 50.0),
                march_sale_titled(2, "Hat", 75.0),
            ],
            &conn,
        )
        .unwrap();

        for term in ["shirt", "SHIRT", "hIr"] {
            let got = get_sales(&SaleFilter::new(MARCH, Some(term)), &conn).unwrap();

            assert_eq!(titles(&got), ["Shirt"], "searching {term:?}");
        }
    }

    #[test]
    fn search_matches_description() {
        let conn = get_test_connection();
        let mut jacket = march_sale_titled(1, "Jacket", 120.0);
        jacket.description = "Waterproof and warm".to_owned();
        insert_sales(&[jacket, march_sale_titled(2, "Hat", 75.0)], &conn).unwrap();

        let got = get_sales(&SaleFilter::new(MARCH, Some("waterproof")), &conn).unwrap();

        assert_eq!(titles(&got), ["Jacket"]);
    }

    #[test]
    fn numeric_search_matches_price() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale_titled(1, "Shirt", 50.0),
                march_sale_titled(2, "Hat", 75.0),
            ],
            &conn,
        )
        .unwrap();

        let got = get_sales(&SaleFilter::new(MARCH, Some("75")), &conn).unwrap();

        assert_eq!(titles(&got), ["Hat"]);
    }

    #[test]
    fn numeric_search_also_matches_text() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale_titled(1, "Pack of 75 pens", 4.5),
                march_sale_titled(2, "Hat", 75.0),
                march_sale_titled(3, "Shirt", 50.0),
            ],
            &conn,
        )
        .unwrap();

        let got = get_sales(&SaleFilter::new(MARCH, Some("75")), &conn).unwrap();

        assert_eq!(titles(&got), ["Pack of 75 pens", "Hat"]);
    }

    #[test]
    fn search_wildcards_are_literal() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale_titled(1, "100% cotton", 20.0),
                march_sale_titled(2, "Cotton blend", 20.0),
                march_sale_titled(3, "snake_case mug", 20.0),
                march_sale_titled(4, "Snakes", 20.0),
            ],
            &conn,
        )
        .unwrap();

        let percent = get_sales(&SaleFilter::new(MARCH, Some("0% c")), &conn).unwrap();
        let underscore = get_sales(&SaleFilter::new(MARCH, Some("e_c")), &conn).unwrap();

        assert_eq!(titles(&percent), ["100% cotton"]);
        assert_eq!(titles(&underscore), ["snake_case mug"]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let filter = SaleFilter::new(MARCH, Some("   "));

        assert_eq!(filter.search, None);
    }

    #[test]
    fn orders_by_dataset_id_then_insertion() {
        let conn = get_test_connection();
        insert_sales(
            &[
                march_sale_titled(2, "Second", 1.0),
                march_sale_titled(1, "First", 1.0),
            ],
            &conn,
        )
        .unwrap();
        insert_sales(&[march_sale_titled(1, "First again", 1.0)], &conn).unwrap();

        let got = get_sales(&SaleFilter::new(MARCH, None), &conn).unwrap();

        assert_eq!(titles(&got), ["First", "First again", "Second"]);
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    fn march_sale_titled(id: i64, title: &str, price: f64) -> Sale {
        Sale {
            title: title.to_owned(),
            description: String::new(),
            ..march_sale(id, price, "misc", false)
        }
    }
}
