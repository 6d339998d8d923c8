//! App shell: drop zone, drag controller, cache restore and error surface.

use hostpie::profile::{self, ChartRecord, ProfileError};
use leptos::ev::{DragEvent, MouseEvent};
use leptos::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

mod chart;
mod fetch;
mod files;
mod legend;
mod storage;
mod tooltip;

use chart::{ChartTargets, PieChart};
use legend::{Legend, LegendRow};
use tooltip::{TooltipPortal, TooltipStore};

/// Bundled sample profile, served next to the app.
const EXAMPLE_PROFILE_URL: &str = "example-profile.json";

const MSG_NOT_JSON: &str = "That file does not appear to be valid JSON.";
const MSG_BAD_SHAPE: &str = "That JSON does not appear to be in the correct format.";
const MSG_READ_FAILED: &str = "Your browser is unable to load that file.";
const MSG_FETCH_FAILED: &str = "The example profile could not be loaded.";
const MSG_RENDER_FAILED: &str = "The chart could not be rendered.";

pub fn start() {
    mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let (dragging, set_dragging) = signal(false);
    let (has_chart, set_has_chart) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let (legend_rows, set_legend_rows) = signal(Vec::<LegendRow>::new());
    let (active_row, set_active_row) = signal::<Option<usize>>(None);
    let (chart_visible, set_chart_visible) = signal(false);
    let tooltip: TooltipStore = RwSignal::new(None);

    // The one live chart. The controller always destroys the previous
    // chart before rendering the next.
    let live_chart = StoredValue::new_local(None::<PieChart>);

    // Single error surface: raw error to the console, static message to
    // the banner.
    let show_error = move |error: &str, message: &str| {
        web_sys::console::error_2(&JsValue::from_str(message), &JsValue::from_str(error));
        set_error.set(Some(message.to_string()));
    };

    let render_records = move |records: Vec<ChartRecord>| {
        set_dragging.set(false);

        live_chart.update_value(|chart| {
            if let Some(mut old) = chart.take() {
                old.destroy();
            }
        });

        let Some(canvas) = canvas_ref.get_untracked() else {
            show_error("canvas is not mounted", MSG_RENDER_FAILED);
            return;
        };

        let targets = ChartTargets {
            canvas,
            legend: set_legend_rows,
            active_row: set_active_row,
            tooltip,
            visible: set_chart_visible,
        };
        match PieChart::render(targets, &records) {
            Ok(new_chart) => {
                set_has_chart.set(true);
                live_chart.set_value(Some(new_chart));
            }
            Err(e) => show_error(&e, MSG_RENDER_FAILED),
        }
    };

    let handle_profile_text = move |text: &str| match profile::parse_profile_json(text) {
        Ok(records) => {
            storage::save_cached_records(&records);
            render_records(records);
        }
        Err(e @ ProfileError::Json(_)) => show_error(&e.to_string(), MSG_NOT_JSON),
        Err(e @ ProfileError::Shape(_)) => show_error(&e.to_string(), MSG_BAD_SHAPE),
    };

    // Restore the cached dataset once the canvas is mounted, or fall back
    // to the bundled example profile.
    let initialized = StoredValue::new(false);
    Effect::new(move |_| {
        if canvas_ref.get().is_none() || initialized.get_value() {
            return;
        }
        initialized.set_value(true);

        if let Some(records) = storage::load_cached_records() {
            render_records(records);
        } else {
            spawn_local(async move {
                match fetch::fetch_text(EXAMPLE_PROFILE_URL).await {
                    Ok(text) => handle_profile_text(&text),
                    Err(e) => show_error(&e, MSG_FETCH_FAILED),
                }
            });
        }
    });

    let on_dragenter = move |_ev: DragEvent| {
        set_dragging.set(true);
        set_error.set(None);
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);

        let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };

        spawn_local(async move {
            match files::read_file_text(file).await {
                Ok(text) => handle_profile_text(&text),
                Err(e) => show_error(&e, MSG_READ_FAILED),
            }
        });
    };

    let on_mousemove = move |ev: MouseEvent| {
        live_chart.with_value(|chart| {
            if let Some(chart) = chart.as_ref() {
                chart.pointer_moved(ev.offset_x() as f64, ev.offset_y() as f64);
            }
        });
    };

    let on_mouseleave = move |_ev: MouseEvent| {
        live_chart.with_value(|chart| {
            if let Some(chart) = chart.as_ref() {
                chart.pointer_left();
            }
        });
    };

    view! {
        <main
            class=move || {
                let mut cls = String::from("drag");
                if dragging.get() {
                    cls.push_str(" dragging");
                }
                if has_chart.get() {
                    cls.push_str(" has-chart");
                }
                cls
            }
            on:dragenter=on_dragenter
            on:dragover=on_dragover
            on:drop=on_drop
        >
            <div class="drag-message">
                <h1>"hostpie"</h1>
                <p>"Drop a JSON performance profile here to see which hosts the time went to."</p>
            </div>

            <Show when=move || error.get().is_some()>
                <div class="drag-error">
                    <div class="drag-error-message">
                        {move || error.get().unwrap_or_default()}
                    </div>
                </div>
            </Show>

            <div
                class="chart-pie"
                style:opacity=move || if chart_visible.get() { "1" } else { "0" }
            >
                <canvas
                    class="chart-pie-canvas"
                    width="500"
                    height="500"
                    node_ref=canvas_ref
                    on:mousemove=on_mousemove
                    on:mouseleave=on_mouseleave
                ></canvas>
                <Legend rows=legend_rows active=active_row />
            </div>

            <TooltipPortal store=tooltip />
        </main>
    }
}
