//! The income/expense pie chart on the dashboard.
//!
//! The chart is generated as ECharts options with `charming` and initialised
//! in the browser by a small script added to the page head.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    transaction::{Totals, pie_slices},
};

/// The ECharts script, loaded from a CDN like htmx.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

const INCOME_COLOUR: &str = "#22c55e";
const EXPENSE_COLOUR: &str = "#ef4444";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The element the chart is drawn into.
pub(super) fn chart_container(chart: &DashboardChart) -> Markup {
    html!(
        div id=(chart.id) class="w-full h-72" {}
    )
}

/// Generates JavaScript initialization code for `charts`.
///
/// The charts use the dark theme and resize with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom, 'dark');
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A pie chart of total income against total expenses.
pub(super) fn summary_pie_chart(totals: &Totals) -> Chart {
    let data: Vec<(f64, &str)> = pie_slices(totals)
        .iter()
        .map(|slice| (slice.value.as_f64(), slice.name))
        .collect();

    Chart::new()
        .title(Title::new().text("สรุปการใช้จ่าย").left("center"))
        .background_color("transparent")
        .color(vec![Color::from(INCOME_COLOUR), Color::from(EXPENSE_COLOUR)])
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("สรุปการใช้จ่าย")
                .radius("70%")
                .label(Label::new().show(true))
                .data(data),
        )
}
