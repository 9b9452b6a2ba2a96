use choropleth_shared::{MapConfig, MapController, MapEvents};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use std::cell::RefCell;

use crate::canvas::MapCanvas;
use crate::loader;

/// The loaded map, or `None` until both inputs have arrived.
#[derive(Clone, Copy)]
pub(crate) struct Map(pub RwSignal<Option<MapController>>);

/// Bumped whenever the canvas must be redrawn (load, palette cycle,
/// outline toggle). Hover mutates `Map` without touching this.
#[derive(Clone, Copy)]
pub(crate) struct PaintGeneration(pub RwSignal<u64>);

#[derive(Clone, Copy)]
pub(crate) struct Status(pub RwSignal<LoadStatus>);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

fn set_loading_shell_step(step: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(step_el) = document.get_element_by_id("app-loading-step") {
        step_el.set_text_content(Some(step));
    }
}

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn cycle_palette(map: RwSignal<Option<MapController>>, generation: RwSignal<u64>) {
    if map.with_untracked(Option::is_none) {
        return;
    }
    map.update(|map| {
        if let Some(map) = map {
            map.on_cycle_palette();
        }
    });
    generation.update(|g| *g = g.wrapping_add(1));
}

fn toggle_outlines(map: RwSignal<Option<MapController>>, generation: RwSignal<u64>) {
    if map.with_untracked(Option::is_none) {
        return;
    }
    map.update(|map| {
        if let Some(map) = map {
            map.on_toggle_outlines();
        }
    });
    generation.update(|g| *g = g.wrapping_add(1));
}

#[component]
pub fn App() -> impl IntoView {
    let config = MapConfig::default();

    let map: RwSignal<Option<MapController>> = RwSignal::new(None);
    let generation: RwSignal<u64> = RwSignal::new(0);
    let status: RwSignal<LoadStatus> = RwSignal::new(LoadStatus::Loading);

    provide_context(Map(map));
    provide_context(PaintGeneration(generation));
    provide_context(Status(status));

    set_loading_shell_step("Fetching county boundaries and densities");
    wasm_bindgen_futures::spawn_local(async move {
        match loader::load_all(&config).await {
            Ok(controller) => {
                web_sys::console::info_1(
                    &format!(
                        "map loaded: {} counties, {} classified",
                        controller.scene().counties.len(),
                        controller.classified_count()
                    )
                    .into(),
                );
                map.set(Some(controller));
                status.set(LoadStatus::Ready);
                generation.update(|g| *g = g.wrapping_add(1));
            }
            Err(e) => {
                web_sys::console::error_1(&format!("map data failed to load: {e}").into());
                status.set(LoadStatus::Failed(e));
            }
        }
        remove_loading_shell();
    });

    // Keyboard shortcuts: `c` cycles the palette, `o` toggles outlines.
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                if e.ctrl_key() || e.meta_key() || e.alt_key() {
                    return;
                }
                match e.key().as_str() {
                    "c" | "C" => cycle_palette(map, generation),
                    "o" | "O" => toggle_outlines(map, generation),
                    _ => {}
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        <div style="display: flex; flex-direction: column; align-items: flex-start; gap: 10px; padding: 16px; font-family: sans-serif;">
            <Controls />
            {move || match status.get() {
                LoadStatus::Failed(e) => view! {
                    <div
                        role="alert"
                        style="padding: 8px 12px; border: 1px solid #d7301f; border-radius: 6px; color: #990000; background: #fff7ec; font-size: 0.85rem;"
                    >
                        {format!("Could not load map data: {e}")}
                    </div>
                }
                .into_any(),
                _ => ().into_any(),
            }}
            <MapCanvas />
        </div>
        <Tooltip />
    }
}

/// The two map controls. Disabled until the map has loaded.
#[component]
fn Controls() -> impl IntoView {
    let Map(map) = expect_context();
    let PaintGeneration(generation) = expect_context();
    let Status(status) = expect_context();

    let disabled = move || status.get() != LoadStatus::Ready;
    let palette_label = move || {
        map.with(|m| {
            m.as_ref()
                .map(|m| format!("Palette: {}", m.render_state().palette))
                .unwrap_or_else(|| "Palette".to_string())
        })
    };
    let outline_label = move || {
        map.with(|m| {
            m.as_ref()
                .map(|m| format!("Outlines: {}", m.render_state().outlines))
                .unwrap_or_else(|| "Outlines".to_string())
        })
    };

    view! {
        <div style="display: flex; gap: 8px;">
            <button
                title="Cycle color palette (c)"
                disabled=disabled
                on:click=move |_| cycle_palette(map, generation)
            >
                {palette_label}
            </button>
            <button
                title="Toggle county outlines (o)"
                disabled=disabled
                on:click=move |_| toggle_outlines(map, generation)
            >
                {outline_label}
            </button>
        </div>
    }
}

/// Tooltip that follows the pointer while a county is hovered.
#[component]
fn Tooltip() -> impl IntoView {
    let Map(map) = expect_context();

    let tooltip = Memo::new(move |_| map.with(|m| m.as_ref().map(|m| m.tooltip().clone())));

    view! {
        {move || {
            let Some(tip) = tooltip.get().filter(|tip| tip.visible) else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let left = format!("{}px", tip.left);
            let top = format!("{}px", tip.top);
            let opacity = tip.opacity().to_string();
            view! {
                <div
                    style:left=left
                    style:top=top
                    style:opacity=opacity
                    style="position: fixed; pointer-events: none; z-index: 100; background: #161921; border: 1px solid #282c3e; border-radius: 6px; box-shadow: 0 4px 16px rgba(0,0,0,0.5); padding: 6px 10px; font-size: 0.75rem; line-height: 1.4; color: #e2e0d8; font-family: sans-serif;"
                >
                    {tip.lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
                </div>
            }.into_any()
        }}
    }
}
