use crowd_api::http::HttpTransport;
use crowd_api::RankingQuery;
use crowd_selection::{RankingFeed, RankingState, TokioRuntime};
use log::info;
use serde_json::{json, Value};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;

const RANKING_TIMEOUT: Duration = Duration::from_secs(30);

fn summarize(query: &RankingQuery, state: &RankingState) -> Value {
    json!({
        "month": query.month,
        "year": query.year,
        "top_n": query.top_n,
        "ranking": state.data,
        "error": state.error,
    })
}

pub async fn run_ranking(
    month: u32,
    year: Option<String>,
    top_n: u32,
    base_url: &str,
) -> anyhow::Result<()> {
    if !(1..=12).contains(&month) {
        anyhow::bail!("month must be between 1 and 12, got {month}");
    }
    let feed = RankingFeed::new(
        Rc::new(HttpTransport::new(base_url)),
        Rc::new(TokioRuntime),
        RANKING_TIMEOUT,
    );
    let query = RankingQuery { month, year, top_n };

    let state = LocalSet::new()
        .run_until(async {
            let request = feed.fetch(query.clone());
            let status = request.settled().await;
            info!("ranking #{} finished: {status:?}", request.id());
            feed.state()
        })
        .await;

    if state.data.is_none() && state.error.is_none() {
        info!("no ranking published for month {month}");
    }
    println!("{}", serde_json::to_string_pretty(&summarize(&query, &state))?);
    if let Some(err) = state.error {
        anyhow::bail!(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ranking_is_null_not_error() {
        let query = RankingQuery {
            month: 8,
            year: None,
            top_n: 6,
        };
        let summary = summarize(&query, &RankingState::default());
        assert!(summary["ranking"].is_null());
        assert!(summary["error"].is_null());
        assert_eq!(summary["month"], 8);
    }

    #[tokio::test]
    async fn rejects_month_out_of_range() {
        let err = run_ranking(13, None, 6, "http://127.0.0.1:9").await.unwrap_err();
        assert!(err.to_string().contains("between 1 and 12"));
    }
}
