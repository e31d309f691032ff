//! Single-flight request slot.
//!
//! A [`SingleFlight`] owns at most one live cancellation token. Starting a
//! request cancels whatever was live before, and a finished request may only
//! commit if it is still the live one. The id check covers transports that
//! ignore their token and finish anyway.

use crate::runtime::Runtime;
use crowd_api::{with_cancel, TransportError};
use futures::channel::oneshot;
use futures::future::{self, Either, FutureExt, Shared};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Resolved,
    Canceled,
    Failed,
}

impl FetchStatus {
    pub fn is_settled(self) -> bool {
        self != FetchStatus::Pending
    }
}

struct RequestInner<P> {
    id: u64,
    params: P,
    status: Cell<FetchStatus>,
    done: RefCell<Option<oneshot::Sender<FetchStatus>>>,
    settled: Shared<oneshot::Receiver<FetchStatus>>,
}

/// Handle to an issued request. Cheap to clone; all clones share the status.
pub struct FetchRequest<P> {
    inner: Rc<RequestInner<P>>,
}

impl<P> Clone for FetchRequest<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for FetchRequest<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("id", &self.inner.id)
            .field("params", &self.inner.params)
            .field("status", &self.inner.status.get())
            .finish()
    }
}

impl<P> FetchRequest<P> {
    fn new(id: u64, params: P) -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            inner: Rc::new(RequestInner {
                id,
                params,
                status: Cell::new(FetchStatus::Pending),
                done: RefCell::new(Some(tx)),
                settled: rx.shared(),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Parameters captured at issue time.
    pub fn params(&self) -> &P {
        &self.inner.params
    }

    pub fn status(&self) -> FetchStatus {
        self.inner.status.get()
    }

    /// Wait until the request resolves, fails, or is canceled.
    pub async fn settled(&self) -> FetchStatus {
        self.inner
            .settled
            .clone()
            .await
            .unwrap_or(FetchStatus::Canceled)
    }

    /// Record the final status. Only the first call has any effect.
    pub(crate) fn complete(&self, status: FetchStatus) {
        if self.inner.status.get().is_settled() {
            return;
        }
        self.inner.status.set(status);
        if let Some(tx) = self.inner.done.borrow_mut().take() {
            let _ = tx.send(status);
        }
    }
}

struct Live<P> {
    request: FetchRequest<P>,
    token: CancellationToken,
}

/// The "one live request" slot.
pub struct SingleFlight<P> {
    live: RefCell<Option<Live<P>>>,
    next_id: Cell<u64>,
}

impl<P> Default for SingleFlight<P> {
    fn default() -> Self {
        Self {
            live: RefCell::new(None),
            next_id: Cell::new(1),
        }
    }
}

impl<P> SingleFlight<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the live request, then install a new one and return its token.
    pub fn begin(&self, params: P) -> (FetchRequest<P>, CancellationToken) {
        self.cancel();
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let request = FetchRequest::new(id, params);
        let token = CancellationToken::new();
        *self.live.borrow_mut() = Some(Live {
            request: request.clone(),
            token: token.clone(),
        });
        (request, token)
    }

    /// Cancel and forget the live request, if any.
    pub fn cancel(&self) -> Option<FetchRequest<P>> {
        let live = self.live.borrow_mut().take()?;
        live.token.cancel();
        live.request.complete(FetchStatus::Canceled);
        Some(live.request)
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.live
            .borrow()
            .as_ref()
            .is_some_and(|live| live.request.id() == id)
    }

    pub fn is_idle(&self) -> bool {
        self.live.borrow().is_none()
    }

    /// Clear the slot if `id` is live. Returns whether it was.
    pub fn finish(&self, id: u64) -> bool {
        let mut live = self.live.borrow_mut();
        if live.as_ref().is_some_and(|l| l.request.id() == id) {
            *live = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<FetchRequest<P>> {
        self.live.borrow().as_ref().map(|l| l.request.clone())
    }
}

/// Run a transport call under its cancellation token and a client-side
/// deadline. The deadline cancels the token so the transport aborts too.
pub(crate) async fn guarded<T, F>(
    runtime: &dyn Runtime,
    token: &CancellationToken,
    timeout: Duration,
    call: F,
) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    let call = with_cancel(token, call);
    let deadline = runtime.sleep(timeout);
    futures::pin_mut!(call);
    match future::select(call, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            token.cancel();
            Err(TransportError::Timeout)
        }
    }
}
