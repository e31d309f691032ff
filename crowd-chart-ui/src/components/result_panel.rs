//! Where the dataset goes once it arrives.

use crate::components::{ErrorDisplay, LoadingSpinner};
use crate::options::caption;
use crate::state::AppState;
use crowd_selection::DataSlot;
use dioxus::prelude::*;

/// DOM id the chart scripts render into.
pub const RESULT_ID: &str = "crowd-result";

/// Shows the spinner, the error, or the payload for the chart scripts.
///
/// The payload is serialized into a `data-*` attribute keyed by its kind;
/// drawing is left to the page's chart scripts.
#[component]
pub fn ResultPanel() -> Element {
    let state = use_context::<AppState>();
    let view = state.view.read().clone();

    if let Some(message) = view.error {
        return rsx! { ErrorDisplay { message } };
    }
    if view.loading {
        return rsx! { LoadingSpinner {} };
    }
    if !view.inputs_complete {
        return rsx! {
            p { style: "color: #666;", "Pick a location, a purpose and a month to see the data." }
        };
    }

    let (kind, dataset) = match &view.data {
        DataSlot::Empty => return rsx! {},
        DataSlot::Trend(d) => ("trend", d),
        DataSlot::Calendar(d) => ("calendar", d),
    };
    let payload = serde_json::to_string(&dataset.data).unwrap_or_default();
    let advice = dataset
        .advice
        .as_ref()
        .and_then(|a| a.as_str())
        .map(str::to_string);
    let heading = caption(&view.selection);

    rsx! {
        div {
            style: "min-height: 400px; position: relative; width: 100%;",
            h4 { style: "margin: 0 0 4px 0;", "{heading}" }
            if let Some(advice) = advice {
                p { style: "font-size: 14px; margin: 0 0 8px 0;", "{advice}" }
            }
            div {
                id: "{RESULT_ID}",
                "data-kind": "{kind}",
                "data-payload": "{payload}",
                style: "width: 100%;",
            }
        }
    }
}
