//! Summary cards shown beside the dashboard charts.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, WIDGET_ERROR_STYLE, format_currency},
    report::Statistics,
};

/// Renders the sale totals for a month.
pub(super) fn statistics_card(month_name: &str, statistics: &Statistics) -> Markup {
    html! {
        section id="statistics" class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month_name) }

            dl class="grid grid-cols-2 gap-2"
            {
                dt { "Total sale" }
                dd id="total-sale-amount" class="text-right" { (format_currency(statistics.total_sale_amount)) }
                dt { "Total sold items" }
                dd id="sold-items" class="text-right" { (statistics.sold_items) }
                dt { "Total not sold items" }
                dd id="unsold-items" class="text-right" { (statistics.unsold_items) }
            }
        }
    }
}

/// Renders a message in place of a widget whose data could not be loaded.
pub(super) fn widget_error(id: &str, message: &str) -> Markup {
    html! {
        div id=(id) role="alert" class=(WIDGET_ERROR_STYLE)
        {
            (message)
        }
    }
}
