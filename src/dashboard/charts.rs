//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for one month of sales:
//! - **Price range chart**: a bar chart of the price histogram
//! - **Category chart**: a pie chart of the number of items in each category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::PreEscaped;

use crate::{
    html::HeadElement,
    report::{CategoryCount, PriceRangeCount},
};

/// The ECharts build loaded by the dashboard page.
pub(super) const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                escape_script_json(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Make JSON safe to embed in an inline `<script>` element.
///
/// Category names come from the seed dataset, so a value such as
/// `</script>` must not be able to close the element. `\u003c` is the
/// same character once the JSON is parsed as JavaScript.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

pub(super) fn price_range_chart(month_name: &str, price_ranges: &[PriceRangeCount]) -> Chart {
    let labels: Vec<String> = price_ranges
        .iter()
        .map(|range| range.bucket_label.clone())
        .collect();
    let counts: Vec<f64> = price_ranges
        .iter()
        .map(|range| range.count as f64)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Price Range")
                .subtext(format!("Items listed in {month_name}")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Items").data(counts))
}

pub(super) fn category_chart(month_name: &str, categories: &[CategoryCount]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.count as f64, category.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Categories")
                .subtext(format!("Items listed in {month_name}")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Items")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}
