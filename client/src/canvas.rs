use std::cell::RefCell;
use std::rc::Rc;

use choropleth_shared::legend::Legend;
use choropleth_shared::{MapConfig, MapController, MapEvents, MapScene, Paint};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, PointerEvent};

use crate::app::{LoadStatus, Map, PaintGeneration, Status};
use crate::render_loop::RenderScheduler;
use crate::spatial::SpatialGrid;

const LEGEND_FONT: &str = "10px sans-serif";
const LEGEND_CAPTION_FONT: &str = "bold 10px sans-serif";
const LEGEND_INK: &str = "#000";

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| *dpr > 0.0)
        .unwrap_or(1.0)
}

#[component]
pub fn MapCanvas() -> impl IntoView {
    let Map(map) = expect_context();
    let PaintGeneration(generation) = expect_context();
    let Status(status) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
    let grid: Rc<RefCell<SpatialGrid>> = Rc::new(RefCell::new(SpatialGrid::build(&[])));

    let scheduler = RenderScheduler::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;

        let ctx = {
            let mut ctx_cache = cached_ctx.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return;
                };
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.clone() else {
                return;
            };
            ctx
        };

        map.with_untracked(|map| {
            let Some(map) = map else {
                return;
            };
            let scene = map.scene();
            let dpr = device_pixel_ratio();
            let (w, h) = ((scene.width * dpr) as u32, (scene.height * dpr) as u32);
            if canvas.width() != w || canvas.height() != h {
                canvas.set_width(w);
                canvas.set_height(h);
            }
            // All drawing stays in CSS pixel coords
            ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
            paint_scene(&ctx, scene);
        });
    });
    let scheduler = Rc::new(scheduler);

    // Geometry only changes on load; styles are read at query time.
    let grid_load = grid.clone();
    Effect::new(move || {
        if status.get() != LoadStatus::Ready {
            return;
        }
        map.with_untracked(|map| {
            if let Some(map) = map {
                *grid_load.borrow_mut() = SpatialGrid::build(&map.scene().counties);
            }
        });
    });

    // Repaint on load, palette cycle and outline toggle. Hover does not
    // bump the generation, so it never redraws the canvas.
    let sched_paint = scheduler.clone();
    Effect::new(move || {
        generation.track();
        sched_paint.mark_dirty();
    });

    let on_pointer_move = {
        let grid = grid.clone();
        move |e: PointerEvent| {
            let local = canvas_ref
                .get_untracked()
                .map(|el| {
                    let rect = el.get_bounding_client_rect();
                    (
                        e.client_x() as f64 - rect.left(),
                        e.client_y() as f64 - rect.top(),
                    )
                })
                .unwrap_or((e.offset_x() as f64, e.offset_y() as f64));
            let pointer = (e.client_x() as f64, e.client_y() as f64);

            let hit = map.with_untracked(|map| {
                let map = map.as_ref()?;
                let counties = &map.scene().counties;
                let idx = grid.borrow().find_at(counties, local.0, local.1)?;
                Some(counties[idx].id.clone())
            });
            match hit {
                Some(id) => map.update(|map| {
                    if let Some(map) = map {
                        map.on_hover(id.as_deref(), pointer);
                    }
                }),
                None => unhover(map),
            }
        }
    };

    let on_pointer_leave = move |_: PointerEvent| unhover(map);

    let config = MapConfig::default();
    let css_width = format!("{}px", config.width);
    let css_height = format!("{}px", config.height);

    view! {
        <canvas
            node_ref=canvas_ref
            on:pointermove=on_pointer_move
            on:pointerleave=on_pointer_leave
            style:width=css_width
            style:height=css_height
            style="display: block; touch-action: none;"
        />
    }
}

fn unhover(map: RwSignal<Option<MapController>>) {
    let visible = map.with_untracked(|m| m.as_ref().is_some_and(|m| m.tooltip().visible));
    if visible {
        map.update(|map| {
            if let Some(map) = map {
                map.on_unhover();
            }
        });
    }
}

/// Draw the whole scene: legend, counties, then the state-border mesh.
fn paint_scene(ctx: &CanvasRenderingContext2d, scene: &MapScene) {
    ctx.clear_rect(0.0, 0.0, scene.width, scene.height);
    paint_legend(ctx, &scene.legend);

    ctx.set_line_width(scene.style.county_stroke_width);
    for county in &scene.counties {
        if county.shape.is_empty() {
            continue;
        }
        ctx.begin_path();
        for ring in county.shape.rings() {
            trace(ctx, ring.coords().map(|c| (c.x, c.y)));
            ctx.close_path();
        }
        if let Paint::Color(fill) = county.style.fill {
            ctx.set_fill_style_str(&fill.to_hex());
            ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
        }
        if let Paint::Color(stroke) = county.style.stroke {
            ctx.set_stroke_style_str(&stroke.to_hex());
            ctx.stroke();
        }
    }

    if let Paint::Color(stroke) = scene.style.state_mesh_stroke {
        ctx.begin_path();
        for line in scene.state_mesh.lines() {
            trace(ctx, line.coords().map(|c| (c.x, c.y)));
        }
        ctx.set_line_join("round");
        ctx.set_line_width(scene.style.state_mesh_width);
        ctx.set_stroke_style_str(&stroke.to_hex());
        ctx.stroke();
        ctx.set_line_join("miter");
    }
}

fn trace(ctx: &CanvasRenderingContext2d, mut points: impl Iterator<Item = (f64, f64)>) {
    let Some((x, y)) = points.next() else {
        return;
    };
    ctx.move_to(x, y);
    for (x, y) in points {
        ctx.line_to(x, y);
    }
}

fn paint_legend(ctx: &CanvasRenderingContext2d, legend: &Legend) {
    let (ox, oy) = legend.origin;

    for swatch in &legend.swatches {
        ctx.set_fill_style_str(&swatch.fill.to_hex());
        ctx.fill_rect(ox + swatch.x, oy, swatch.width, legend.swatch_height);
    }

    ctx.set_fill_style_str(LEGEND_INK);
    ctx.set_font(LEGEND_CAPTION_FONT);
    ctx.set_text_align("start");
    ctx.set_text_baseline("alphabetic");
    ctx.fill_text(&legend.caption.text, ox + legend.caption.x, oy + legend.caption.y)
        .ok();

    ctx.set_stroke_style_str(LEGEND_INK);
    ctx.set_line_width(1.0);
    ctx.set_font(LEGEND_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    for tick in &legend.ticks {
        let x = ox + tick.x;
        ctx.begin_path();
        ctx.move_to(x, oy);
        ctx.line_to(x, oy + legend.tick_size);
        ctx.stroke();
        ctx.fill_text(&tick.label, x, oy + legend.tick_size + 3.0).ok();
    }
}
