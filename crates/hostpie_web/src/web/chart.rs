//! Canvas pie-chart renderer.
//!
//! The geometry (angles, centroids, hit tests) comes from `hostpie::pie`;
//! this module owns the canvas painting, the opening animation and the
//! hover wiring. Animation state lives in an explicit per-slice vector on
//! the chart instance, keyed by slice index.

use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use hostpie::color::ColorScale;
use hostpie::pie::{self, PieSlice};
use hostpie::profile::ChartRecord;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use web_time::Instant;

use super::legend::LegendRow;
use super::tooltip::{TooltipPayload, TooltipStore};

/// Length of the opening angle tween, in ms.
const OPENING_MS: f64 = 600.0;
/// Length of the per-slice scale release and label fade.
const RELEASE_MS: f64 = 250.0;
/// Paint cadence of the animation driver.
const TICK_MS: i32 = 16;
/// Label font size for a full-width slice, in canvas pixels.
const LABEL_BASE_PX: f64 = 16.0;

/// Everything the renderer draws into or feeds, passed in explicitly: the
/// canvas element plus the signals backing the legend, the legend
/// highlight, the tooltip and the container visibility.
pub(super) struct ChartTargets {
    pub(super) canvas: HtmlCanvasElement,
    pub(super) legend: WriteSignal<Vec<LegendRow>>,
    pub(super) active_row: WriteSignal<Option<usize>>,
    pub(super) tooltip: TooltipStore,
    pub(super) visible: WriteSignal<bool>,
}

/// Per-slice animation state. `current` is what the last frame painted and
/// what hover hit-tests run against.
struct SliceAnim {
    from: PieSlice,
    to: PieSlice,
    current: PieSlice,
    /// ms after start at which the 0.5 → 1.0 scale release begins.
    scale_delay: f64,
    /// ms after start at which the label starts fading in.
    label_delay: f64,
}

struct SliceStyle {
    fill: String,
    fill_active: String,
    stroke: String,
}

/// A live chart. Dropping the handle does not tear the chart down; call
/// [`PieChart::destroy`].
pub(super) struct PieChart {
    inner: Rc<RefCell<ChartInner>>,
}

impl PieChart {
    /// Build and start a chart over `records`. The legend fills, the
    /// container becomes visible, and the opening animation starts on a
    /// `setInterval` driver that stops itself once every slice settles.
    pub(super) fn render(
        targets: ChartTargets,
        records: &[ChartRecord],
    ) -> Result<PieChart, String> {
        let ctx = context_2d(&targets.canvas)?;
        let scale = ColorScale::for_records(records);

        let values: Vec<f64> = records.iter().map(|r| r.value as f64).collect();
        let end = pie::pie_layout(&values);
        let start = pie::pie_layout(&pie::opening_weights(records.len()));
        let n = records.len().max(1) as f64;

        let slices: Vec<SliceAnim> = start
            .into_iter()
            .zip(end)
            .enumerate()
            .map(|(i, (from, to))| SliceAnim {
                from,
                to,
                current: from,
                scale_delay: OPENING_MS + 50.0 + (i as f64) * OPENING_MS / n,
                label_delay: OPENING_MS * 1.5 + 50.0 + (i as f64) * OPENING_MS / n,
            })
            .collect();

        let styles: Vec<SliceStyle> = records
            .iter()
            .map(|r| {
                let fill = scale.color(r.value as f64);
                SliceStyle {
                    fill: fill.to_css(),
                    fill_active: fill.darker(-0.5).to_css(),
                    stroke: fill.darker(0.1).to_css(),
                }
            })
            .collect();

        targets.legend.set(
            records
                .iter()
                .zip(&styles)
                .map(|(r, s)| LegendRow {
                    display: r.display.clone(),
                    label: r.label.clone(),
                    swatch_css: s.fill.clone(),
                })
                .collect(),
        );
        targets.active_row.set(None);
        targets.tooltip.set(None);
        targets.visible.set(true);

        let settle_at = slices
            .last()
            .map(|s| s.label_delay + RELEASE_MS)
            .unwrap_or(0.0);
        let total: f64 = values.iter().sum();
        let animate = !records.is_empty();

        let inner = Rc::new(RefCell::new(ChartInner {
            ctx,
            targets,
            records: records.to_vec(),
            styles,
            slices,
            total,
            settle_at,
            started: Instant::now(),
            interval: None,
            tick_closure: None,
            hovered: None,
            destroyed: false,
        }));

        inner.borrow_mut().paint(0.0);
        if animate {
            ChartInner::start_ticker(&inner)?;
        }

        Ok(PieChart { inner })
    }

    /// Tear down everything this chart put on screen: stop the animation,
    /// clear the canvas, empty the legend, hide the tooltip and the
    /// container. Idempotent.
    pub(super) fn destroy(&mut self) {
        self.inner.borrow_mut().destroy();
    }

    /// Pointer moved over the canvas, in CSS pixels relative to it.
    pub(super) fn pointer_moved(&self, css_x: f64, css_y: f64) {
        self.inner.borrow_mut().pointer_moved(css_x, css_y);
    }

    /// Pointer left the canvas entirely.
    pub(super) fn pointer_left(&self) {
        self.inner.borrow_mut().pointer_left();
    }
}

struct ChartInner {
    ctx: CanvasRenderingContext2d,
    targets: ChartTargets,
    records: Vec<ChartRecord>,
    styles: Vec<SliceStyle>,
    slices: Vec<SliceAnim>,
    total: f64,
    settle_at: f64,
    started: Instant,
    interval: Option<i32>,
    tick_closure: Option<Closure<dyn FnMut()>>,
    hovered: Option<usize>,
    destroyed: bool,
}

impl ChartInner {
    fn start_ticker(inner: &Rc<RefCell<ChartInner>>) -> Result<(), String> {
        let window = web_sys::window().ok_or("no window".to_string())?;

        let tick_target = Rc::clone(inner);
        let cb = Closure::wrap(Box::new(move || {
            let mut chart = tick_target.borrow_mut();
            if chart.destroyed {
                return;
            }
            let elapsed = chart.elapsed_ms();
            chart.paint(elapsed);
            if elapsed >= chart.settle_at {
                chart.stop_ticker();
            }
        }) as Box<dyn FnMut()>);

        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                TICK_MS,
            )
            .map_err(|_| "failed to start animation timer".to_string())?;

        let mut chart = inner.borrow_mut();
        chart.interval = Some(id);
        chart.tick_closure = Some(cb);
        Ok(())
    }

    fn stop_ticker(&mut self) {
        if let Some(id) = self.interval.take() {
            if let Some(w) = web_sys::window() {
                w.clear_interval_with_handle(id);
            }
        }
        // Also drops the Rc the closure holds, so a settled chart is kept
        // alive by its handle alone.
        self.tick_closure = None;
    }

    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.stop_ticker();

        let w = self.targets.canvas.width() as f64;
        let h = self.targets.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);

        self.targets.legend.set(Vec::new());
        self.targets.active_row.set(None);
        self.targets.tooltip.set(None);
        self.targets.visible.set(false);
    }

    fn paint(&mut self, elapsed: f64) {
        let w = self.targets.canvas.width() as f64;
        let h = self.targets.canvas.height() as f64;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let radius = w.min(h) / 2.0;
        let inner_r = radius * pie::INNER_RADIUS_RATIO;
        let outer_r = radius * pie::OUTER_RADIUS_RATIO;

        let t = ease_cubic_in_out((elapsed / OPENING_MS).clamp(0.0, 1.0));
        for anim in &mut self.slices {
            anim.current = pie::lerp_slice(anim.from, anim.to, t);
        }

        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w, h);

        for (i, anim) in self.slices.iter().enumerate() {
            let slice = anim.current;
            if slice.sweep() <= 0.0 {
                continue;
            }

            let k = scale_release(elapsed, anim.scale_delay);
            ctx.save();
            let _ = ctx.translate(cx, cy);
            let _ = ctx.scale(k, k);

            // Annulus sector: outer arc clockwise, inner arc back.
            let a0 = slice.start_angle - FRAC_PI_2;
            let a1 = slice.end_angle - FRAC_PI_2;
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, outer_r, a0, a1);
            let _ = ctx.arc_with_anticlockwise(0.0, 0.0, inner_r, a1, a0, true);
            ctx.close_path();

            let style = &self.styles[i];
            let fill = if self.hovered == Some(i) {
                &style.fill_active
            } else {
                &style.fill
            };
            ctx.set_fill_style_str(fill);
            ctx.fill();
            ctx.set_stroke_style_str(&style.stroke);
            ctx.set_line_width(3.0);
            ctx.stroke();
            ctx.restore();
        }

        // Labels on top of all slices.
        let n = self.slices.len() as f64;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for (i, anim) in self.slices.iter().enumerate() {
            let slice = anim.current;
            if slice.sweep() <= pie::LABEL_MIN_ANGLE {
                continue;
            }
            let alpha = label_alpha(elapsed, anim.label_delay);
            if alpha <= 0.0 {
                continue;
            }

            let (x, y) = pie::centroid(slice, inner_r, outer_r);
            let push = 0.8 + 0.5 * (i as f64) / n;
            let px = (LABEL_BASE_PX * pie::label_scale(slice)).round();
            ctx.set_font(&format!("{px}px system-ui, sans-serif"));
            ctx.set_fill_style_str(&format!("rgba(232, 236, 255, {alpha:.3})"));
            let _ = ctx.fill_text(&self.records[i].display, cx + x * push, cy + y * push);
        }
    }

    fn pointer_moved(&mut self, css_x: f64, css_y: f64) {
        if self.destroyed {
            return;
        }

        let canvas = &self.targets.canvas;
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let w = canvas.width() as f64;
        let h = canvas.height() as f64;
        let lx = css_x * w / rect.width();
        let ly = css_y * h / rect.height();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let radius = w.min(h) / 2.0;
        let inner_r = radius * pie::INNER_RADIUS_RATIO;
        let outer_r = radius * pie::OUTER_RADIUS_RATIO;

        let current: Vec<PieSlice> = self.slices.iter().map(|a| a.current).collect();
        let hit = pie::slice_at(&current, inner_r, outer_r, lx - cx, ly - cy);
        if hit == self.hovered {
            return;
        }

        self.hovered = hit;
        self.targets.active_row.set(hit);
        match hit {
            Some(i) => {
                let slice = current[i];
                let (x, y) = pie::centroid(slice, inner_r, outer_r);
                let pct = if self.total > 0.0 {
                    ((slice.value / self.total) * 100.0).trunc() as i64
                } else {
                    0
                };
                self.targets.tooltip.set(Some(TooltipPayload {
                    text: format!("{}, {pct}%", self.records[i].label),
                    left_px: rect.left() + (cx + x) * rect.width() / w,
                    top_px: rect.top() + (cy + y) * rect.height() / h,
                }));
            }
            None => self.targets.tooltip.set(None),
        }

        let elapsed = self.elapsed_ms();
        self.paint(elapsed);
    }

    fn pointer_left(&mut self) {
        if self.destroyed || self.hovered.is_none() {
            return;
        }
        self.hovered = None;
        self.targets.active_row.set(None);
        self.targets.tooltip.set(None);
        let elapsed = self.elapsed_ms();
        self.paint(elapsed);
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "get_context failed".to_string())?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "cast failed".to_string())
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

fn scale_release(elapsed: f64, delay: f64) -> f64 {
    if elapsed <= delay {
        0.5
    } else {
        (0.5 + 0.5 * (elapsed - delay) / RELEASE_MS).min(1.0)
    }
}

fn label_alpha(elapsed: f64, delay: f64) -> f64 {
    if elapsed <= delay {
        0.0
    } else {
        ((elapsed - delay) / RELEASE_MS).min(1.0)
    }
}
