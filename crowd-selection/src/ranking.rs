//! Monthly ranking panel.
//!
//! Runs beside the main dataset with its own single-flight slot, so a ranking
//! refresh never cancels the dataset request or the other way round.

use crate::flight::{guarded, FetchRequest, FetchStatus, SingleFlight};
use crate::observe::{Listeners, SubscriptionId};
use crate::runtime::Runtime;
use crowd_api::{RankingQuery, RankingResponse, Transport, TransportError};
use futures::FutureExt;
use log::{debug, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Rows shown in the ranking panel.
pub const DEFAULT_TOP_N: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingState {
    pub loading: bool,
    /// `None` means "no ranking for this month", which is not an error.
    pub data: Option<Value>,
    pub error: Option<String>,
}

struct Inner {
    transport: Rc<dyn Transport>,
    runtime: Rc<dyn Runtime>,
    flight: SingleFlight<RankingQuery>,
    timeout: Duration,
    state: RefCell<RankingState>,
    listeners: Listeners<RankingState>,
}

impl Inner {
    fn notify(&self) {
        let state = self.state.borrow().clone();
        self.listeners.notify(&state);
    }

    fn update(&self, f: impl FnOnce(&mut RankingState)) {
        f(&mut self.state.borrow_mut());
        self.notify();
    }
}

#[derive(Clone)]
pub struct RankingFeed {
    inner: Rc<Inner>,
}

impl RankingFeed {
    pub fn new(transport: Rc<dyn Transport>, runtime: Rc<dyn Runtime>, timeout: Duration) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                runtime,
                flight: SingleFlight::new(),
                timeout,
                state: RefCell::new(RankingState::default()),
                listeners: Listeners::default(),
            }),
        }
    }

    pub fn state(&self) -> RankingState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&RankingState) + 'static) -> SubscriptionId {
        self.inner.listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Fetch the ranking for `month`, letting the backend pick the fiscal
    /// year when `year` is `None`.
    pub fn load(&self, month: u32, year: Option<String>) -> FetchRequest<RankingQuery> {
        self.fetch(RankingQuery {
            month,
            year,
            top_n: DEFAULT_TOP_N,
        })
    }

    pub fn fetch(&self, query: RankingQuery) -> FetchRequest<RankingQuery> {
        let (request, token) = self.inner.flight.begin(query.clone());
        debug!("ranking #{} month={} year={:?}", request.id(), query.month, query.year);
        self.inner.update(|state| {
            state.loading = true;
            state.error = None;
        });

        let inner = Rc::clone(&self.inner);
        let handle = request.clone();
        let task = async move {
            let call = inner.transport.get_monthly_ranking(query, token.clone());
            let outcome = guarded(inner.runtime.as_ref(), &token, inner.timeout, call).await;
            settle(&inner, &handle, outcome);
        };
        self.inner.runtime.spawn(task.boxed_local());
        request
    }

    /// Cancel the live ranking request and clear the spinner.
    pub fn cancel(&self) {
        if self.inner.flight.cancel().is_some() {
            self.inner.update(|state| state.loading = false);
        }
    }

    /// Forget the ranking, e.g. when the selection no longer names a month.
    pub fn clear(&self) {
        self.inner.flight.cancel();
        self.inner.update(|state| *state = RankingState::default());
    }
}

fn settle(
    inner: &Inner,
    request: &FetchRequest<RankingQuery>,
    outcome: Result<RankingResponse, TransportError>,
) {
    let id = request.id();
    let was_live = inner.flight.finish(id);
    if !was_live {
        request.complete(FetchStatus::Canceled);
        return;
    }

    match outcome {
        Err(err) if err.is_cancel() => {
            request.complete(FetchStatus::Canceled);
            inner.update(|state| state.loading = false);
        }
        Err(err) if err.is_status(404) => {
            debug!("ranking #{id}: no data for this month");
            request.complete(FetchStatus::Resolved);
            inner.update(|state| {
                state.loading = false;
                state.data = None;
                state.error = None;
            });
        }
        Err(err) => {
            warn!("ranking #{id} failed: {err}");
            request.complete(FetchStatus::Failed);
            inner.update(|state| {
                state.loading = false;
                state.data = None;
                state.error = Some(format!("Failed to fetch ranking: {err}"));
            });
        }
        Ok(RankingResponse {
            success: true,
            data: Some(data),
            ..
        }) => {
            request.complete(FetchStatus::Resolved);
            inner.update(|state| {
                state.loading = false;
                state.data = Some(data);
            });
        }
        Ok(response) => {
            let message = response
                .message
                .unwrap_or_else(|| "unexpected response shape".to_string());
            warn!("ranking #{id} rejected: {message}");
            request.complete(FetchStatus::Failed);
            inner.update(|state| {
                state.loading = false;
                state.data = None;
                state.error = Some(format!("Failed to fetch ranking: {message}"));
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{settle as settle_all, ScriptedTransport};
    use crate::TokioRuntime;
    use serde_json::json;
    use tokio::task::LocalSet;

    fn feed(transport: &Rc<ScriptedTransport>) -> RankingFeed {
        RankingFeed::new(
            Rc::clone(transport) as Rc<dyn Transport>,
            Rc::new(TokioRuntime),
            Duration::from_secs(30),
        )
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn not_found_is_empty_not_error() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.rank_with(|_| (Duration::from_millis(10), Err(TransportError::Status(404))));
                let ranking = feed(&transport);

                let req = ranking.load(8, None);
                assert!(ranking.state().loading);
                assert_eq!(req.settled().await, FetchStatus::Resolved);
                assert_eq!(ranking.state(), RankingState::default());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn newer_month_supersedes_older() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.rank_with(|q| {
                    let delay = if q.month == 7 { 500 } else { 20 };
                    let body = RankingResponse {
                        success: true,
                        data: Some(json!({"month": q.month})),
                        message: None,
                    };
                    (Duration::from_millis(delay), Ok(body))
                });
                let ranking = feed(&transport);

                let july = ranking.load(7, None);
                let august = ranking.load(8, Some("R6".into()));
                settle_all().await;

                assert_eq!(july.status(), FetchStatus::Canceled);
                assert_eq!(august.status(), FetchStatus::Resolved);
                let state = ranking.state();
                assert_eq!(state.data, Some(json!({"month": 8})));
                assert!(!state.loading);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn unsuccessful_envelope_is_an_error() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.rank_with(|_| {
                    let body = RankingResponse {
                        success: false,
                        data: None,
                        message: Some("no fiscal year".into()),
                    };
                    (Duration::from_millis(10), Ok(body))
                });
                let ranking = feed(&transport);

                assert_eq!(ranking.load(8, None).settled().await, FetchStatus::Failed);
                assert_eq!(
                    ranking.state().error.as_deref(),
                    Some("Failed to fetch ranking: no fiscal year")
                );
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancel_clears_spinner() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                let ranking = feed(&transport);

                let req = ranking.load(8, None);
                ranking.cancel();
                assert!(!ranking.state().loading);
                settle_all().await;
                assert_eq!(req.status(), FetchStatus::Canceled);
                assert_eq!(ranking.state().data, None);
            })
            .await;
    }
}
