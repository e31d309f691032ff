//! Dropdown selector for the monitored location.

use crate::components::LoadingSpinner;
use crate::options::LOCATIONS;
use crate::state::{AppState, Engine};
use dioxus::prelude::*;

/// Location dropdown. Disabled while a fetch is running.
#[component]
pub fn LocationSelector() -> Element {
    let state = use_context::<AppState>();
    let engine = use_context::<Engine>();
    let view = state.view.read().clone();
    let selected = view.selection.location.clone();

    let on_change = move |evt: Event<FormData>| {
        engine.store.set_location(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "location-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Location: "
            }
            select {
                id: "location-select",
                disabled: view.loading,
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "Choose a location" }
                for loc in LOCATIONS.iter() {
                    option {
                        value: "{loc.value}",
                        selected: loc.value == selected,
                        "{loc.label}"
                    }
                }
            }
            if view.changing.location {
                LoadingSpinner { label: "updating".to_string(), inline: true }
            }
        }
    }
}
