//! Year and month pickers with previous/next month buttons.

use crate::components::LoadingSpinner;
use crate::state::{AppState, Engine};
use crowd_utils::dates::{available_months, available_years, next_month, previous_month};
use dioxus::prelude::*;

/// Year/month selects bounded to the data range, plus month stepping.
/// Stepping goes through `set_year_month` so a January/December rollover
/// issues a single fetch.
#[component]
pub fn YearMonthPicker() -> Element {
    let state = use_context::<AppState>();
    let engine = use_context::<Engine>();
    let view = state.view.read().clone();
    let today = engine.store.config().clock.today();

    let year = view.selection.year.clone();
    let month = view.selection.month.clone();
    let years = available_years(today);
    let months = available_months(&year, today);
    let busy = view.loading || view.changing.date;
    let previous = previous_month(&year, &month).filter(|_| !busy);
    let next = next_month(&year, &month, today).filter(|_| !busy);

    let store = engine.store.clone();
    let on_year = move |evt: Event<FormData>| store.set_year(evt.value());
    let store = engine.store.clone();
    let on_month = move |evt: Event<FormData>| store.set_month(evt.value());
    let store = engine.store.clone();
    let step_back = previous.clone();
    let on_previous = move |_: Event<MouseData>| {
        if let Some((y, m)) = step_back.clone() {
            store.set_year_month(y, m);
        }
    };
    let store = engine.store.clone();
    let step_forward = next.clone();
    let on_next = move |_: Event<MouseData>| {
        if let Some((y, m)) = step_forward.clone() {
            store.set_year_month(y, m);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 8px; align-items: center;",
            button {
                disabled: previous.is_none(),
                onclick: on_previous,
                "<"
            }
            select {
                disabled: busy,
                onchange: on_year,
                option { value: "", selected: year.is_empty(), "----" }
                for y in years.iter() {
                    option { value: "{y}", selected: *y == year, "{y}" }
                }
            }
            select {
                disabled: busy || year.is_empty(),
                onchange: on_month,
                option { value: "", selected: month.is_empty(), "--" }
                for m in months.iter() {
                    option { value: "{m}", selected: *m == month, "{m}" }
                }
            }
            button {
                disabled: next.is_none(),
                onclick: on_next,
                ">"
            }
            if view.changing.date {
                LoadingSpinner { label: "updating".to_string(), inline: true }
            }
        }
    }
}
