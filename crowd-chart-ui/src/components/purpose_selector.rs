//! Dropdown selector for the purpose (`action`).

use crate::components::LoadingSpinner;
use crate::options::purposes_for;
use crate::state::{AppState, Engine};
use dioxus::prelude::*;

/// Purpose dropdown. Only offers what the current page context allows.
#[component]
pub fn PurposeSelector() -> Element {
    let state = use_context::<AppState>();
    let engine = use_context::<Engine>();
    let view = state.view.read().clone();
    let choices = purposes_for(&engine.store.config().policies, view.context);
    let selected = view.selection.purpose.clone();

    let on_change = move |evt: Event<FormData>| {
        engine.store.set_purpose(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "purpose-select",
                style: "font-weight: bold; margin-right: 8px;",
                "I want to: "
            }
            select {
                id: "purpose-select",
                disabled: view.loading,
                onchange: on_change,
                option { value: "", selected: selected.is_empty(), "Choose a purpose" }
                for purpose in choices.iter() {
                    option {
                        value: "{purpose.value}",
                        selected: purpose.value == selected,
                        "{purpose.label}"
                    }
                }
            }
            if view.changing.purpose {
                LoadingSpinner { label: "updating".to_string(), inline: true }
            }
        }
    }
}
