//! Monthly foreign-visitor ranking shown above the main dataset.

use crate::components::LoadingSpinner;
use crate::state::{AppState, Engine};
use dioxus::prelude::*;
use serde_json::Value;

/// One row of the ranking payload.
fn row_text(item: &Value) -> Option<String> {
    let rank = item.get("rank")?.as_u64()?;
    let country = item.get("country")?.as_str()?;
    let guests = item.get("guests").and_then(Value::as_u64).unwrap_or(0);
    Some(format!("{rank}. {country} {guests}"))
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Clear,
    Keep,
    Load(u32),
}

/// Decide what the panel does for the settled `year`/`month`, updating the
/// remembered key. Clearing forgets the key so the same month loads again.
fn next_step(requested: &mut Option<(String, String)>, year: &str, month: &str) -> Step {
    if year.is_empty() || month.is_empty() {
        *requested = None;
        return Step::Clear;
    }
    let key = (year.to_string(), month.to_string());
    if requested.as_ref() == Some(&key) {
        return Step::Keep;
    }
    match month.parse::<u32>() {
        Ok(number) => {
            *requested = Some(key);
            Step::Load(number)
        }
        Err(_) => {
            log::warn!("ranking skipped for month {month:?}");
            Step::Keep
        }
    }
}

/// Loads the ranking for the selected month once the main fetch is idle,
/// and hides itself when there is nothing to show.
#[component]
pub fn RankingPanel() -> Element {
    let state = use_context::<AppState>();
    let engine = use_context::<Engine>();
    let mut requested = use_signal(|| None::<(String, String)>);

    use_effect({
        let ranking = engine.ranking.clone();
        move || {
            let view = state.view.read();
            if view.loading || view.changing.date {
                return;
            }
            let mut remembered = requested.peek().clone();
            let step = next_step(&mut remembered, &view.selection.year, &view.selection.month);
            if *requested.peek() != remembered {
                requested.set(remembered);
            }
            match step {
                Step::Clear => ranking.clear(),
                Step::Load(month) => {
                    ranking.load(month, None);
                }
                Step::Keep => {}
            }
        }
    });

    let ranking = state.ranking.read().clone();
    if ranking.loading {
        return rsx! { LoadingSpinner { label: "ranking...".to_string(), inline: true } };
    }
    let rows: Vec<String> = ranking
        .data
        .as_ref()
        .and_then(|data| data.get("ranking"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(row_text).collect())
        .unwrap_or_default();
    if ranking.error.is_some() || rows.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            style: "padding: 4px 8px; margin-bottom: 8px; font-size: 12px; display: flex; gap: 8px; flex-wrap: wrap;",
            strong { "Foreign guests this month:" }
            for row in rows.iter() {
                span { style: "white-space: nowrap;", "{row}" }
            }
        }
    }
}
