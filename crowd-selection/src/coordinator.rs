//! Request coordinator for the main dataset.
//!
//! Owns the single live request slot. Every issued request runs as a local
//! task; when it finishes it commits to its [`FetchSink`] only if it is still
//! the live request. Superseded and canceled requests never touch state.

use crate::flight::{guarded, FetchRequest, FetchStatus, SingleFlight};
use crate::payload::{DataSlot, TrendPurposes};
use crate::runtime::Runtime;
use crate::selection::FetchParams;
use crowd_api::Transport;
use futures::FutureExt;
use log::{debug, info, warn};
use std::rc::Rc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where a request reports its progress.
pub trait FetchSink {
    /// A request became live: show the spinner, drop the previous error.
    fn begin(&self, request: &FetchRequest<FetchParams>);

    /// The live request succeeded.
    fn commit(&self, slot: DataSlot);

    /// The live request failed; the message replaces the visualization.
    fn fail(&self, message: String);

    /// Always called last: clear `loading` and every changing flag.
    fn settle(&self);
}

pub struct RequestCoordinator {
    transport: Rc<dyn Transport>,
    runtime: Rc<dyn Runtime>,
    flight: Rc<SingleFlight<FetchParams>>,
    trend_purposes: TrendPurposes,
    timeout: Duration,
}

impl RequestCoordinator {
    pub fn new(
        transport: Rc<dyn Transport>,
        runtime: Rc<dyn Runtime>,
        trend_purposes: TrendPurposes,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            runtime,
            flight: Rc::new(SingleFlight::new()),
            trend_purposes,
            timeout,
        }
    }

    /// Cancel whatever is live and issue a request for `params`.
    pub fn fetch(&self, params: FetchParams, sink: Rc<dyn FetchSink>) -> FetchRequest<FetchParams> {
        let (request, token) = self.flight.begin(params);
        info!(
            "fetch #{} place={} action={} {}/{}",
            request.id(),
            request.params().location,
            request.params().purpose,
            request.params().year,
            request.params().month
        );
        sink.begin(&request);

        let task = run_request(
            Rc::clone(&self.transport),
            Rc::clone(&self.runtime),
            Rc::clone(&self.flight),
            self.trend_purposes.clone(),
            self.timeout,
            request.clone(),
            token,
            sink,
        );
        self.runtime.spawn(task.boxed_local());
        request
    }

    /// Cancel the live request, if any. The sink is not settled; the caller
    /// clears its own loading state.
    pub fn cancel(&self) -> Option<FetchRequest<FetchParams>> {
        let canceled = self.flight.cancel();
        if let Some(req) = &canceled {
            debug!("canceled fetch #{}", req.id());
        }
        canceled
    }

    pub fn current(&self) -> Option<FetchRequest<FetchParams>> {
        self.flight.current()
    }

    pub fn is_idle(&self) -> bool {
        self.flight.is_idle()
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_request(
    transport: Rc<dyn Transport>,
    runtime: Rc<dyn Runtime>,
    flight: Rc<SingleFlight<FetchParams>>,
    trend_purposes: TrendPurposes,
    timeout: Duration,
    request: FetchRequest<FetchParams>,
    token: CancellationToken,
    sink: Rc<dyn FetchSink>,
) {
    let id = request.id();
    let params = request.params().clone();
    let outcome = match params.to_graph_request() {
        Ok(graph) => {
            let call = transport.get_graph(graph, token.clone());
            guarded(runtime.as_ref(), &token, timeout, call).await
        }
        Err(err) => Err(err),
    };
    let was_live = flight.finish(id);

    match outcome {
        Err(err) if err.is_cancel() => {
            debug!("fetch #{id} canceled");
            // Whoever canceled owns the flags: a newer request, or a
            // reset/teardown/mount that already cleared them.
            request.complete(FetchStatus::Canceled);
            return;
        }
        _ if !was_live => {
            debug!("fetch #{id} superseded, discarding result");
            request.complete(FetchStatus::Canceled);
            return;
        }
        Ok(response) => {
            let slot = trend_purposes.classify(&params.purpose, response);
            debug!("fetch #{id} resolved as {:?}", slot.kind());
            sink.commit(slot);
            request.complete(FetchStatus::Resolved);
        }
        Err(err) => {
            warn!("fetch #{id} failed: {err}");
            sink.fail(format!("Failed to fetch data: {err}"));
            request.complete(FetchStatus::Failed);
        }
    }
    sink.settle();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadKind;
    use crate::testing::{settle, ScriptedTransport};
    use crate::TokioRuntime;
    use crowd_api::TransportError;
    use std::cell::RefCell;
    use tokio::task::LocalSet;

    #[derive(Default)]
    struct RecordingSink {
        events: RefCell<Vec<String>>,
        slot: RefCell<DataSlot>,
    }

    impl FetchSink for RecordingSink {
        fn begin(&self, request: &FetchRequest<FetchParams>) {
            self.events.borrow_mut().push(format!("begin {}", request.id()));
        }

        fn commit(&self, slot: DataSlot) {
            self.events.borrow_mut().push("commit".into());
            *self.slot.borrow_mut() = slot;
        }

        fn fail(&self, message: String) {
            self.events.borrow_mut().push(format!("fail {message}"));
        }

        fn settle(&self) {
            self.events.borrow_mut().push("settle".into());
        }
    }

    fn coordinator(transport: &Rc<ScriptedTransport>) -> RequestCoordinator {
        RequestCoordinator::new(
            Rc::clone(transport) as Rc<dyn Transport>,
            Rc::new(TokioRuntime),
            TrendPurposes::default(),
            Duration::from_secs(30),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_request_commits() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                // earlier months answer slower, the classic out-of-order race
                transport.respond_with(|req| {
                    let delay = Duration::from_millis(1000 - u64::from(req.month) * 100);
                    ScriptedTransport::calendar(req, delay)
                });
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let reqs: Vec<_> = ["5", "6", "7", "8"]
                    .iter()
                    .map(|m| {
                        coord.fetch(
                            FetchParams::new("station", "cal_cog", "2024", *m),
                            Rc::clone(&sink) as Rc<dyn FetchSink>,
                        )
                    })
                    .collect();
                settle().await;

                for req in &reqs[..3] {
                    assert_eq!(req.status(), FetchStatus::Canceled);
                }
                assert_eq!(reqs[3].status(), FetchStatus::Resolved);
                assert!(transport.calls()[..3].iter().all(|c| c.token.is_cancelled()));

                let events = sink.events.borrow();
                assert_eq!(events.iter().filter(|e| *e == "commit").count(), 1);
                assert_eq!(events.last().map(String::as_str), Some("settle"));
                let slot = sink.slot.borrow();
                assert_eq!(slot.kind(), Some(PayloadKind::Calendar));
                assert_eq!(slot.dataset().unwrap().data["month"], 8);
                assert!(coord.is_idle());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_is_dropped_even_if_transport_ignores_token() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.set_ignore_cancel(true);
                transport.respond_with(|req| {
                    let delay = if req.month == 7 { 50 } else { 500 };
                    ScriptedTransport::calendar(req, Duration::from_millis(delay))
                });
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let first = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "8"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                let second = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "7"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                settle().await;

                assert_eq!(first.status(), FetchStatus::Canceled);
                assert_eq!(second.status(), FetchStatus::Resolved);
                let slot = sink.slot.borrow();
                assert_eq!(slot.dataset().unwrap().data["month"], 7);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reports_message_and_settles() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.respond_with(|_| {
                    (Duration::from_millis(10), Err(TransportError::Status(500)))
                });
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let req = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "7"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                assert_eq!(req.settled().await, FetchStatus::Failed);

                let events = sink.events.borrow();
                assert_eq!(
                    events.as_slice(),
                    [
                        "begin 1".to_string(),
                        "fail Failed to fetch data: server responded with status 500".to_string(),
                        "settle".to_string(),
                    ]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_transport_times_out() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                transport.respond_with(|req| ScriptedTransport::calendar(req, Duration::from_secs(120)));
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let req = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "7"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                assert_eq!(req.settled().await, FetchStatus::Failed);
                assert!(transport.calls()[0].token.is_cancelled());
                assert!(sink
                    .events
                    .borrow()
                    .iter()
                    .any(|e| e == "fail Failed to fetch data: request timed out"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_never_reaches_the_sink() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let req = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "7"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                coord.cancel();
                settle().await;

                assert_eq!(req.status(), FetchStatus::Canceled);
                let events = sink.events.borrow();
                assert_eq!(events.as_slice(), ["begin 1".to_string()]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn non_numeric_month_fails_without_network() {
        LocalSet::new()
            .run_until(async {
                let transport = Rc::new(ScriptedTransport::new());
                let coord = coordinator(&transport);
                let sink = Rc::new(RecordingSink::default());

                let req = coord.fetch(
                    FetchParams::new("station", "cal_cog", "2024", "July"),
                    Rc::clone(&sink) as Rc<dyn FetchSink>,
                );
                assert_eq!(req.settled().await, FetchStatus::Failed);
                assert!(transport.calls().is_empty());
            })
            .await;
    }
}
