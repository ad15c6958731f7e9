//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
    /// The number of records per page in the dashboard's transaction table.
    pub dashboard_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
            dashboard_page_size: 5,
            max_pages: 5,
        }
    }
}

pub(crate) const PAGE_PARAM: &str = "page";
pub(crate) const PER_PAGE_PARAM: &str = "perPage";

/// A validated, 1-indexed page of records to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The page number, starting from 1.
    pub page: u64,
    /// The maximum number of records on a page.
    pub per_page: u64,
}

impl PageRequest {
    /// Build a page request from raw query parameter values.
    ///
    /// Missing or blank values fall back to the defaults in `config`, and
    /// `per_page` is capped at [PaginationConfig::max_page_size].
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if either value is not a positive integer.
    pub fn from_params(
        page: Option<&str>,
        per_page: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let page = parse_positive(PAGE_PARAM, page)?.unwrap_or(config.default_page);
        let per_page = parse_positive(PER_PAGE_PARAM, per_page)?
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        Ok(Self { page, per_page })
    }

    /// The number of records to skip to reach this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// The number of pages needed to show `total_count` records.
    pub fn page_count(&self, total_count: u64) -> u64 {
        total_count.div_ceil(self.per_page)
    }
}

fn parse_positive(name: &'static str, value: Option<&str>) -> Result<Option<u64>, Error> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match value.parse::<u64>() {
        Ok(number) if number > 0 => Ok(Some(number)),
        _ => Err(Error::InvalidParameter {
            name,
            value: value.to_owned(),
            reason: "expected a positive integer",
        }),
    }
}

/// An item in the dashboard's pagination bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page being displayed.
    CurrPage(u64),
    /// A gap of hidden page links.
    Ellipsis,
    /// A link to the following page.
    NextButton(u64),
    /// A link to the preceding page.
    BackButton(u64),
}

/// Build the pagination bar for `curr_page` out of `page_count` pages.
///
/// At most `max_pages` page links are shown in a window around the current
/// page. When pages are hidden, links to the first and last page are added
/// with an ellipsis marking the gap.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    if page_count == 0 {
        return Vec::new();
    }

    let half_window = max_pages / 2;
    let (window_start, window_end) = if page_count <= max_pages {
        (1, page_count)
    } else if curr_page <= half_window {
        (1, max_pages)
    } else if curr_page > page_count - half_window {
        (page_count - max_pages + 1, page_count)
    } else {
        (curr_page - half_window, curr_page + half_window)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));
        if window_start > 2 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
    }

    indicators.extend((window_start..=window_end).map(|page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    }));

    if window_end < page_count {
        if window_end < page_count - 1 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
