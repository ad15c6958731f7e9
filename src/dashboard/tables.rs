//! The dashboard's transaction table and its pagination bar.

use maud::{Markup, html};

use crate::{
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    pagination::{PaginationIndicator, create_pagination_indicators},
    sale::{Sale, SalePage},
};

/// Renders one page of sales as a table followed by the pagination bar.
///
/// `page_url` maps a page number to the URL that displays it.
pub(super) fn transactions_table(
    page: &SalePage,
    max_pages: u64,
    page_url: impl Fn(u64) -> String,
) -> Markup {
    let indicators = create_pagination_indicators(page.page, page.page_count, max_pages);

    html! {
        div class="w-full overflow-x-auto shadow-md rounded-lg"
        {
            table id="transactions-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Image" }
                    }
                }

                tbody
                {
                    @for sale in &page.sales {
                        (sale_row(sale))
                    }

                    @if page.sales.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="7" class=(TABLE_CELL_STYLE) { "No transactions found." }
                        }
                    }
                }
            }
        }

        div class="flex justify-between items-center w-full mt-4 text-sm"
        {
            span { "Page " (page.page) " of " (page.page_count.max(1)) }

            nav aria-label="Transaction table pages"
            {
                ul class="inline-flex -space-x-px"
                {
                    @for indicator in &indicators {
                        li class="px-3 py-2" { (pagination_item(indicator, &page_url)) }
                    }
                }
            }

            span { (page.per_page) " per page" }
        }
    }
}

fn sale_row(sale: &Sale) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (sale.id) }
            td class=(TABLE_CELL_STYLE) { (sale.title) }
            td class=(TABLE_CELL_STYLE) { (sale.description) }
            td class=(TABLE_CELL_STYLE) { (format_currency(sale.price)) }
            td class=(TABLE_CELL_STYLE) { (sale.category) }
            td class=(TABLE_CELL_STYLE) { @if sale.sold { "Yes" } @else { "No" } }
            td class=(TABLE_CELL_STYLE)
            {
                img src=(sale.image) alt=(sale.title) class="w-12 h-12 object-contain";
            }
        }
    }
}

fn pagination_item(indicator: &PaginationIndicator, page_url: &impl Fn(u64) -> String) -> Markup {
    match indicator {
        PaginationIndicator::Page(page) => html! {
            a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
        },
        PaginationIndicator::CurrPage(page) => html! {
            span aria-current="page" class="font-bold" { (page) }
        },
        PaginationIndicator::Ellipsis => html! {
            span { "..." }
        },
        PaginationIndicator::NextButton(page) => html! {
            a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Next" }
        },
        PaginationIndicator::BackButton(page) => html! {
            a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Back" }
        },
    }
}
