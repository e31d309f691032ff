//! Fakes shared by the unit tests.

use crate::config::{Clock, EngineConfig};
use crate::persistence::MemoryStore;
use crate::runtime::{TokioRuntime, Viewport};
use crate::store::{Adapters, SelectionStore};
use crate::url::MemoryQuery;
use chrono::NaiveDate;
use crowd_api::{
    with_cancel, GraphRequest, GraphResponse, RankingQuery, RankingResponse, Transport,
    TransportError,
};
use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) type Scripted<T> = (Duration, Result<T, TransportError>);

type GraphScript = Box<dyn Fn(&GraphRequest) -> Scripted<GraphResponse>>;
type RankingScript = Box<dyn Fn(&RankingQuery) -> Scripted<RankingResponse>>;

#[derive(Clone)]
pub(crate) struct Call {
    pub request: GraphRequest,
    pub token: CancellationToken,
}

/// Transport whose answers and latencies are scripted per request.
pub(crate) struct ScriptedTransport {
    graph: RefCell<GraphScript>,
    ranking: RefCell<RankingScript>,
    calls: RefCell<Vec<Call>>,
    ignore_cancel: Cell<bool>,
}

impl ScriptedTransport {
    /// Calendar answers after 100 ms, echoing the requested month.
    pub fn new() -> Self {
        Self {
            graph: RefCell::new(Box::new(|req: &GraphRequest| Self::calendar(req, Duration::from_millis(100)))),
            ranking: RefCell::new(Box::new(|_: &RankingQuery| {
                (Duration::from_millis(100), Ok(RankingResponse::default()))
            })),
            calls: RefCell::new(Vec::new()),
            ignore_cancel: Cell::new(false),
        }
    }

    pub fn calendar(req: &GraphRequest, delay: Duration) -> Scripted<GraphResponse> {
        let body = GraphResponse {
            data: json!({"month": req.month, "place": req.place}),
            advice: Some(json!("check the weekend")),
            ..Default::default()
        };
        (delay, Ok(body))
    }

    pub fn respond_with(&self, script: impl Fn(&GraphRequest) -> Scripted<GraphResponse> + 'static) {
        *self.graph.borrow_mut() = Box::new(script);
    }

    pub fn rank_with(&self, script: impl Fn(&RankingQuery) -> Scripted<RankingResponse> + 'static) {
        *self.ranking.borrow_mut() = Box::new(script);
    }

    /// Keep running after the token fires, like a transport that cannot abort.
    pub fn set_ignore_cancel(&self, ignore: bool) {
        self.ignore_cancel.set(ignore);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn play<T: 'static>(
        &self,
        (delay, result): Scripted<T>,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<T, TransportError>> {
        let answer = async move {
            tokio::time::sleep(delay).await;
            result
        };
        if self.ignore_cancel.get() {
            answer.boxed_local()
        } else {
            async move { with_cancel(&cancel, answer).await }.boxed_local()
        }
    }
}

impl Transport for ScriptedTransport {
    fn get_graph(
        &self,
        request: GraphRequest,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<GraphResponse, TransportError>> {
        let scripted = (*self.graph.borrow())(&request);
        self.calls.borrow_mut().push(Call {
            request,
            token: cancel.clone(),
        });
        self.play(scripted, cancel)
    }

    fn get_monthly_ranking(
        &self,
        query: RankingQuery,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<RankingResponse, TransportError>> {
        let scripted = (*self.ranking.borrow())(&query);
        self.play(scripted, cancel)
    }
}

#[derive(Default)]
pub(crate) struct CountingViewport(Cell<usize>);

impl CountingViewport {
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

impl Viewport for CountingViewport {
    fn scroll_to_top(&self) {
        self.0.set(self.0.get() + 1);
    }
}

pub(crate) struct Harness {
    pub store: SelectionStore,
    pub transport: Rc<ScriptedTransport>,
    pub cookies: Rc<MemoryStore>,
    pub query: Rc<MemoryQuery>,
    pub viewport: Rc<CountingViewport>,
}

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
}

pub(crate) fn harness(query: &str) -> Harness {
    harness_with(Rc::new(MemoryStore::new()), Rc::new(MemoryQuery::from_query(query)))
}

pub(crate) fn harness_with(cookies: Rc<MemoryStore>, query: Rc<MemoryQuery>) -> Harness {
    let transport = Rc::new(ScriptedTransport::new());
    let viewport = Rc::new(CountingViewport::default());
    let config = EngineConfig {
        clock: Clock::Fixed(today()),
        ..EngineConfig::default()
    };
    let adapters = Adapters {
        transport: Rc::clone(&transport) as Rc<dyn Transport>,
        store: Rc::clone(&cookies) as _,
        query: Rc::clone(&query) as _,
        viewport: Rc::clone(&viewport) as _,
        runtime: Rc::new(TokioRuntime),
    };
    Harness {
        store: SelectionStore::new(config, adapters),
        transport,
        cookies,
        query,
        viewport,
    }
}

/// Let every pending request, timeout and settle delay run out.
pub(crate) fn settle() -> impl Future<Output = ()> {
    tokio::time::sleep(Duration::from_secs(120))
}
