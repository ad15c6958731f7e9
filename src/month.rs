//! The month filter shared by the listing, aggregation and dashboard queries.
//!
//! Sale dates are parsed into structured dates when records are inserted, and
//! the month number is stored alongside the raw date string. Filtering by
//! month therefore compares integers instead of matching substrings of the
//! date text.

use time::{
    Date, Month, OffsetDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// Restricts a query to the records sold in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    /// Match every record, including records whose sale date could not be parsed.
    #[default]
    All,
    /// Match only records sold in the given month of any year.
    Only(Month),
}

impl MonthFilter {
    /// Parse an optional query parameter value into a filter.
    ///
    /// A missing or blank value yields [MonthFilter::All].
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if `value` is not a month number.
    pub fn from_optional_param(value: Option<&str>) -> Result<Self, Error> {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => parse_month(value).map(MonthFilter::Only),
            None => Ok(MonthFilter::All),
        }
    }

    /// Parse a query parameter value that the endpoint requires.
    ///
    /// # Errors
    /// Returns [Error::MissingParameter] if `value` is missing or blank,
    /// or [Error::InvalidParameter] if `value` is not a month number.
    pub fn from_required_param(value: Option<&str>) -> Result<Self, Error> {
        match Self::from_optional_param(value)? {
            MonthFilter::All => Err(Error::MissingParameter(MONTH_PARAM)),
            filter => Ok(filter),
        }
    }

    /// The value to bind to the `sale_month` SQL parameter, `None` meaning any month.
    pub(crate) fn sql_value(self) -> Option<u8> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Only(month) => Some(month as u8),
        }
    }

    /// The month as a two-digit code, e.g. "03" for March.
    pub fn code(self) -> Option<String> {
        self.sql_value().map(|month| format!("{month:02}"))
    }
}

pub(crate) const MONTH_PARAM: &str = "month";

/// The months in calendar order, used to build month selectors.
pub(crate) const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse "1" to "12", optionally zero-padded, into a month.
fn parse_month(value: &str) -> Result<Month, Error> {
    let invalid = || Error::InvalidParameter {
        name: MONTH_PARAM,
        value: value.to_owned(),
        reason: "expected a month number from 01 to 12",
    };

    if value.len() > 2 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    value
        .parse::<u8>()
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .ok_or_else(invalid)
}

/// Extract the month from a sale date string.
///
/// Accepts RFC 3339 date-times (e.g. "2021-11-27T20:29:54+05:30") and
/// anything that starts with a `YYYY-MM-DD` calendar date.
/// Returns `None` for dates in any other format.
pub(crate) fn parse_sale_month(date_of_sale: &str) -> Option<Month> {
    if let Ok(date_time) = OffsetDateTime::parse(date_of_sale, &Rfc3339) {
        return Some(date_time.month());
    }

    let date_prefix = date_of_sale.get(..10)?;
    Date::parse(date_prefix, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.month())
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        Error,
        month::{MonthFilter, parse_sale_month},
    };

    #[test]
    fn parses_padded_and_unpadded_months() {
        assert_eq!(
            MonthFilter::from_required_param(Some("03")),
            Ok(MonthFilter::Only(Month::March))
        );
        assert_eq!(
            MonthFilter::from_required_param(Some("3")),
            Ok(MonthFilter::Only(Month::March))
        );
        assert_eq!(
            MonthFilter::from_required_param(Some(" 12 ")),
            Ok(MonthFilter::Only(Month::December))
        );
    }

    #[test]
    fn missing_month_is_all_when_optional() {
        assert_eq!(MonthFilter::from_optional_param(None), Ok(MonthFilter::All));
        assert_eq!(
            MonthFilter::from_optional_param(Some("  ")),
            Ok(MonthFilter::All)
        );
    }

    #[test]
    fn missing_month_is_an_error_when_required() {
        assert_eq!(
            MonthFilter::from_required_param(None),
            Err(Error::MissingParameter("month"))
        );
        assert_eq!(
            MonthFilter::from_required_param(Some("")),
            Err(Error::MissingParameter("month"))
        );
    }

    #[test]
    fn rejects_values_that_are_not_months() {
        for value in ["0", "00", "13", "-1", "March", "003", "1.5"] {
            let result = MonthFilter::from_optional_param(Some(value));

            assert!(
                matches!(result, Err(Error::InvalidParameter { name: "month", .. })),
                "want invalid parameter error for {value:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn code_is_zero_padded() {
        assert_eq!(MonthFilter::Only(Month::July).code(), Some("07".to_owned()));
        assert_eq!(MonthFilter::All.code(), None);
    }

    #[test]
    fn parses_rfc3339_sale_dates() {
        assert_eq!(
            parse_sale_month("2021-11-27T20:29:54+05:30"),
            Some(Month::November)
        );
        assert_eq!(parse_sale_month("2022-03-01T00:00:00Z"), Some(Month::March));
    }

    #[test]
    fn parses_plain_calendar_dates() {
        assert_eq!(parse_sale_month("2022-06-15"), Some(Month::June));
        assert_eq!(parse_sale_month("2022-06-15 10:00"), Some(Month::June));
    }

    #[test]
    fn malformed_dates_have_no_month() {
        assert_eq!(parse_sale_month(""), None);
        assert_eq!(parse_sale_month("15/06/2022"), None);
        assert_eq!(parse_sale_month("2022-13-01"), None);
        assert_eq!(parse_sale_month("yesterday"), None);
    }
}
