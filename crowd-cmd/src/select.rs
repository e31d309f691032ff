//! `fetch` and `reset`: the selection engine on a terminal.

use crate::file_store::FileStore;
use crowd_api::http::HttpTransport;
use crowd_selection::{
    Adapters, DataSlot, EngineConfig, FetchStatus, MemoryQuery, NoopViewport, PageContext,
    QueryParams, SelectionStore, SelectionView, TokioRuntime,
};
use log::info;
use serde_json::{json, Value};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;

/// Flags that play the role of URL params: they win over the state file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl Overrides {
    fn to_query(&self) -> MemoryQuery {
        let query = MemoryQuery::new();
        let pairs = [
            ("location", &self.location),
            ("action", &self.purpose),
            ("year", &self.year),
            ("month", &self.month),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                query.write_param(key, value);
            }
        }
        query
    }
}

fn build_store(
    state_file: &Path,
    query: MemoryQuery,
    transport: HttpTransport,
    config: EngineConfig,
) -> anyhow::Result<SelectionStore> {
    let cookies = FileStore::open(state_file, config.clock.today())?;
    let adapters = Adapters {
        transport: Rc::new(transport),
        store: Rc::new(cookies),
        query: Rc::new(query),
        viewport: Rc::new(NoopViewport),
        runtime: Rc::new(TokioRuntime),
    };
    Ok(SelectionStore::new(config, adapters))
}

/// JSON summary of a settled view.
pub fn summarize(view: &SelectionView) -> Value {
    let (kind, dataset) = match &view.data {
        DataSlot::Empty => (Value::Null, None),
        DataSlot::Trend(d) => (json!("trend"), Some(d)),
        DataSlot::Calendar(d) => (json!("calendar"), Some(d)),
    };
    json!({
        "context": view.context.as_str(),
        "selection": view.selection,
        "complete": view.inputs_complete,
        "kind": kind,
        "error": view.error,
        "advice": dataset.and_then(|d| d.advice.clone()),
        "data": dataset.map(|d| d.data.clone()),
    })
}

pub async fn run_fetch(
    context: PageContext,
    overrides: Overrides,
    state_file: &Path,
    base_url: &str,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let config = EngineConfig {
        request_timeout: Duration::from_secs(timeout_secs),
        ..EngineConfig::default()
    };
    let store = build_store(
        state_file,
        overrides.to_query(),
        HttpTransport::new(base_url),
        config,
    )?;

    let view = LocalSet::new()
        .run_until(async {
            match store.mount(context) {
                Some(request) => {
                    let status = request.settled().await;
                    info!("request #{} finished: {status:?}", request.id());
                    if status == FetchStatus::Canceled {
                        anyhow::bail!("request was canceled");
                    }
                }
                None => info!("selection incomplete, nothing fetched"),
            }
            Ok(store.view())
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&summarize(&view))?);
    store.teardown();
    Ok(())
}

pub async fn run_reset(context: PageContext, state_file: &Path) -> anyhow::Result<()> {
    let config = EngineConfig::default();
    let store = build_store(
        state_file,
        MemoryQuery::new(),
        HttpTransport::new(crowd_api::base_url()),
        config,
    )?;
    LocalSet::new()
        .run_until(async {
            // The mount's request is canceled before it is ever polled.
            store.mount(context);
            store.reset_all();
            tokio::task::yield_now().await;
        })
        .await;
    store.teardown();
    println!("cleared {} selection in {}", context, state_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowd_selection::{ChangingFlags, Dataset, Selection};

    #[test]
    fn overrides_become_query_params() {
        let overrides = Overrides {
            location: Some("station".into()),
            month: Some("7".into()),
            ..Default::default()
        };
        let query = overrides.to_query();
        assert_eq!(query.to_query_string(), "location=station&month=7");
    }

    #[test]
    fn summary_names_the_payload_kind() {
        let view = SelectionView {
            context: PageContext::Function,
            selection: Selection {
                location: "station".into(),
                purpose: "week_trend".into(),
                year: "2024".into(),
                month: "7".into(),
            },
            loading: false,
            changing: ChangingFlags::default(),
            error: None,
            data: DataSlot::Trend(Dataset {
                data: json!([1, 2]),
                ..Default::default()
            }),
            inputs_complete: true,
        };
        let summary = summarize(&view);
        assert_eq!(summary["kind"], "trend");
        assert_eq!(summary["context"], "function");
        assert_eq!(summary["selection"]["purpose"], "week_trend");
        assert_eq!(summary["data"], json!([1, 2]));
    }
}
