//! Crowd dashboard
//!
//! One page per route: `/` shows every purpose, `/purpose` the planning
//! purposes and `/function` the analysis views. Each route mounts its own
//! selection engine, namespaced so that the three pages remember their own
//! picks.
//!
//! Data flow:
//! 1. On mount the engine reconciles URL params, cookies and defaults.
//! 2. The header pickers call the engine's setters; every complete
//!    selection issues one request, cancelling whatever was in flight.
//! 3. `AppState` mirrors the engine's read model and the panels re-render.
//! 4. Coming back to a hidden tab refetches the current selection.

use crowd_chart_ui::components::{
    LocationSelector, PurposeSelector, RankingPanel, ResultPanel, YearMonthPicker,
};
use crowd_chart_ui::state::{use_selection_engine, AppState, Engine};
use crowd_selection::PageContext;
use dioxus::prelude::*;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

fn main() {
    if dioxus_logger::init(dioxus_logger::tracing::Level::INFO).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("crowd-dashboard-root"))
        .launch(App);
}

fn current_context() -> PageContext {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .map(|path| PageContext::from_path(&path))
        .unwrap_or_default()
}

fn page_title(context: PageContext) -> &'static str {
    match context {
        PageContext::Default => "Crowd Dashboard",
        PageContext::Purpose => "Plan by Purpose",
        PageContext::Function => "Explore the Data",
    }
}

/// Refetch when the tab becomes visible again. The listener is removed when
/// the page unmounts.
fn use_refetch_on_visible(engine: Engine) {
    let listener = use_hook(move || {
        let callback = Closure::<dyn FnMut()>::new(move || {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .is_some_and(|d| d.hidden());
            if !hidden {
                log::debug!("tab visible again, refetching");
                engine.store.refetch();
            }
        });
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.add_event_listener_with_callback(
                "visibilitychange",
                callback.as_ref().unchecked_ref(),
            );
        }
        Rc::new(callback)
    });

    use_drop(move || {
        let callback: &Closure<dyn FnMut()> = &listener;
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.remove_event_listener_with_callback(
                "visibilitychange",
                callback.as_ref().unchecked_ref(),
            );
        }
    });
}

#[component]
fn App() -> Element {
    let context = use_hook(current_context);
    let engine = use_selection_engine(context);
    use_refetch_on_visible(engine.clone());
    let state = use_context::<AppState>();
    let busy = state.view.read().loading;

    let on_reset = move |_: Event<MouseData>| engine.store.reset_all();

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            h2 { style: "margin: 0 0 8px 0;", "{page_title(context)}" }

            div {
                style: "display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end; margin-bottom: 8px;",
                LocationSelector {}
                PurposeSelector {}
                YearMonthPicker {}
                button {
                    disabled: busy,
                    onclick: on_reset,
                    "Reset"
                }
            }

            RankingPanel {}
            ResultPanel {}
        }
    }
}
