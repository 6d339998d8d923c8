use leptos::prelude::*;

/// Tooltip contents plus its viewport position (the hovered slice's
/// centroid, mapped through the canvas bounding rect).
#[derive(Clone, Debug, PartialEq)]
pub(super) struct TooltipPayload {
    pub(super) text: String,
    pub(super) top_px: f64,
    pub(super) left_px: f64,
}

pub(super) type TooltipStore = RwSignal<Option<TooltipPayload>>;

#[component]
pub(super) fn TooltipPortal(store: TooltipStore) -> impl IntoView {
    view! {
        <Show when=move || store.get().is_some() fallback=|| ()>
            {move || {
                let p = store
                    .get()
                    .expect("Show guarantees payload is Some when rendered");

                let style = format!(
                    "top: {}px; left: {}px;",
                    p.top_px.round() as i64,
                    p.left_px.round() as i64
                );

                view! {
                    <div class="chart-pie-tooltip" role="tooltip" style=style>
                        {p.text}
                    </div>
                }
            }}
        </Show>
    }
}
