use leptos::prelude::*;

/// One legend row, in the same order as the chart records.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct LegendRow {
    pub(super) display: String,
    pub(super) label: String,
    pub(super) swatch_css: String,
}

#[component]
pub(super) fn Legend(
    rows: ReadSignal<Vec<LegendRow>>,
    active: ReadSignal<Option<usize>>,
) -> impl IntoView {
    view! {
        <div class="chart-pie-legend">
            <For
                each=move || rows.get().into_iter().enumerate()
                key=|(i, row)| (*i, row.label.clone())
                children=move |(i, row)| {
                    let swatch = format!("background-color: {};", row.swatch_css);
                    view! {
                        <div class=move || {
                            if active.get() == Some(i) {
                                "chart-pie-legend-row active"
                            } else {
                                "chart-pie-legend-row"
                            }
                        }>
                            <div class="chart-pie-legend-value">{row.display}</div>
                            <div class="chart-pie-legend-color" style=swatch></div>
                            <div class="chart-pie-legend-label">{row.label}</div>
                        </div>
                    }
                }
            />
        </div>
    }
}
