//! The selection store: one per mounted page context.
//!
//! Presentation code reads [`SelectionView`] snapshots and calls the setters;
//! nothing else mutates the selection. Every setter runs its side effects
//! synchronously in a fixed order (changing flag, field, URL, persistence,
//! scroll, fetch) and then notifies subscribers.

use crate::config::EngineConfig;
use crate::context::{Field, PageContext};
use crate::coordinator::{FetchSink, RequestCoordinator};
use crate::flight::FetchRequest;
use crate::observe::{Listeners, SubscriptionId};
use crate::payload::DataSlot;
use crate::persistence::{NamespacedStore, PersistentStore};
use crate::runtime::{Runtime, Viewport};
use crate::selection::{ChangingFlag, ChangingFlags, FetchParams, Selection};
use crate::url::QueryParams;
use crowd_api::Transport;
use futures::FutureExt;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Everything the store needs from its environment.
#[derive(Clone)]
pub struct Adapters {
    pub transport: Rc<dyn Transport>,
    pub store: Rc<dyn PersistentStore>,
    pub query: Rc<dyn QueryParams>,
    pub viewport: Rc<dyn Viewport>,
    pub runtime: Rc<dyn Runtime>,
}

/// Read model handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionView {
    pub context: PageContext,
    pub selection: Selection,
    pub loading: bool,
    pub changing: ChangingFlags,
    pub error: Option<String>,
    pub data: DataSlot,
    pub inputs_complete: bool,
}

#[derive(Default)]
pub(crate) struct State {
    pub(crate) context: PageContext,
    pub(crate) selection: Selection,
    pub(crate) loading: bool,
    pub(crate) changing: ChangingFlags,
    pub(crate) error: Option<String>,
    pub(crate) data: DataSlot,
    /// Setters persist only once the first bootstrap has resolved defaults.
    pub(crate) bootstrapped: bool,
}

impl State {
    fn view(&self) -> SelectionView {
        SelectionView {
            context: self.context,
            selection: self.selection.clone(),
            loading: self.loading,
            changing: self.changing,
            error: self.error.clone(),
            data: self.data.clone(),
            inputs_complete: self.selection.inputs_complete(),
        }
    }
}

pub(crate) struct Inner {
    pub(crate) config: EngineConfig,
    pub(crate) adapters: Adapters,
    pub(crate) state: RefCell<State>,
    pub(crate) coordinator: RequestCoordinator,
    pub(crate) bootstrapping: Cell<bool>,
    listeners: Listeners<SelectionView>,
    settle_epoch: Cell<u64>,
}

impl Inner {
    pub(crate) fn notify(&self) {
        let view = self.state.borrow().view();
        self.listeners.notify(&view);
    }

    pub(crate) fn ttl_for(&self, value: &str) -> u32 {
        if value.is_empty() {
            0
        } else {
            self.config.cookie_ttl_days
        }
    }
}

impl FetchSink for Inner {
    fn begin(&self, _request: &FetchRequest<FetchParams>) {
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
    }

    fn commit(&self, slot: DataSlot) {
        let mut state = self.state.borrow_mut();
        state.data = slot;
        state.error = None;
    }

    fn fail(&self, message: String) {
        let mut state = self.state.borrow_mut();
        state.data = DataSlot::Empty;
        state.error = Some(message);
    }

    fn settle(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.loading = false;
            state.changing.clear();
        }
        self.notify();
    }
}

/// Shared handle to one page context's selection. Clones refer to the same
/// store.
#[derive(Clone)]
pub struct SelectionStore {
    pub(crate) inner: Rc<Inner>,
}

impl SelectionStore {
    pub fn new(config: EngineConfig, adapters: Adapters) -> Self {
        let coordinator = RequestCoordinator::new(
            Rc::clone(&adapters.transport),
            Rc::clone(&adapters.runtime),
            config.trend_purposes.clone(),
            config.request_timeout,
        );
        Self {
            inner: Rc::new(Inner {
                config,
                adapters,
                state: RefCell::new(State::default()),
                coordinator,
                bootstrapping: Cell::new(false),
                listeners: Listeners::default(),
                settle_epoch: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn view(&self) -> SelectionView {
        self.inner.state.borrow().view()
    }

    pub fn selection(&self) -> Selection {
        self.inner.state.borrow().selection.clone()
    }

    pub fn context(&self) -> PageContext {
        self.inner.state.borrow().context
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// The live request, if one is in flight.
    pub fn pending_request(&self) -> Option<FetchRequest<FetchParams>> {
        self.inner.coordinator.current()
    }

    pub fn subscribe(&self, listener: impl Fn(&SelectionView) + 'static) -> SubscriptionId {
        self.inner.listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.remove(id)
    }

    pub fn set_location(&self, location: impl Into<String>) {
        self.apply(&[(Field::Location, location.into())]);
    }

    pub fn set_purpose(&self, purpose: impl Into<String>) {
        self.apply(&[(Field::Purpose, purpose.into())]);
    }

    pub fn set_year(&self, year: impl Into<String>) {
        self.apply(&[(Field::Year, year.into())]);
    }

    pub fn set_month(&self, month: impl Into<String>) {
        self.apply(&[(Field::Month, month.into())]);
    }

    /// Update year and month together, issuing at most one fetch.
    pub fn set_year_month(&self, year: impl Into<String>, month: impl Into<String>) {
        self.apply(&[(Field::Year, year.into()), (Field::Month, month.into())]);
    }

    /// Re-issue the fetch for the current selection without touching any
    /// field. Does nothing while the selection is incomplete.
    pub fn refetch(&self) -> Option<FetchRequest<FetchParams>> {
        let params = self.inner.state.borrow().selection.fetch_params()?;
        let request = self.fetch(params);
        self.inner.notify();
        Some(request)
    }

    /// Clear every field along with its URL param and persisted value, and
    /// cancel the live request.
    pub fn reset_all(&self) {
        let inner = &self.inner;
        inner.coordinator.cancel();
        let context = {
            let mut state = inner.state.borrow_mut();
            state.selection = Selection::default();
            state.data = DataSlot::Empty;
            state.error = None;
            state.loading = false;
            state.changing.clear();
            state.context
        };
        let persisted = NamespacedStore::new(inner.adapters.store.as_ref(), context);
        for field in Field::ALL {
            inner.adapters.query.write_param(field.key(), "");
            persisted.write(field.key(), "", 0);
        }
        info!("selection reset for {context}");
        inner.notify();
    }

    /// Cancel the live request and drop every subscriber. The store can be
    /// mounted again afterwards.
    pub fn teardown(&self) {
        debug!("teardown {}", self.context());
        self.inner.coordinator.cancel();
        self.inner.listeners.clear();
        let mut state = self.inner.state.borrow_mut();
        state.loading = false;
        state.changing.clear();
        state.bootstrapped = false;
    }

    pub(crate) fn fetch(&self, params: FetchParams) -> FetchRequest<FetchParams> {
        let sink: Rc<dyn FetchSink> = Rc::clone(&self.inner) as Rc<dyn FetchSink>;
        self.inner.coordinator.fetch(params, sink)
    }

    fn apply(&self, updates: &[(Field, String)]) {
        let inner = &self.inner;
        let (context, persist, changed) = {
            let mut state = inner.state.borrow_mut();
            let changed: Vec<(Field, String)> = updates
                .iter()
                .filter(|(field, value)| state.selection.get(*field) != value)
                .cloned()
                .collect();
            if changed.is_empty() {
                return;
            }
            for (field, _) in &changed {
                state.changing.set(ChangingFlag::from(*field), true);
            }
            for (field, value) in &changed {
                state.selection.set(*field, value.clone());
            }
            (state.context, state.bootstrapped, changed)
        };

        let persisted = NamespacedStore::new(inner.adapters.store.as_ref(), context);
        for (field, value) in &changed {
            debug!("{} <- {value:?}", field.key());
            inner.adapters.query.write_param(field.key(), value);
            if persist {
                persisted.write(field.key(), value, inner.ttl_for(value));
            }
        }
        inner.adapters.viewport.scroll_to_top();

        // Siblings are read from the store now, not from the caller.
        let params = inner.state.borrow().selection.fetch_params();
        match params {
            Some(params) => {
                self.fetch(params);
            }
            None => self.schedule_flag_clear(),
        }
        inner.notify();
    }

    /// Drop every raised changing flag after the settle delay unless a fetch
    /// has taken over. A newer call restarts the delay and covers the flags
    /// raised before it.
    fn schedule_flag_clear(&self) {
        let inner = &self.inner;
        let epoch = inner.settle_epoch.get() + 1;
        inner.settle_epoch.set(epoch);

        let weak: Weak<Inner> = Rc::downgrade(inner);
        let delay = inner.adapters.runtime.sleep(inner.config.settle_delay);
        let task = async move {
            delay.await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.settle_epoch.get() != epoch {
                return;
            }
            {
                let mut state = inner.state.borrow_mut();
                if state.loading {
                    return;
                }
                state.changing.clear();
            }
            inner.notify();
        };
        inner.adapters.runtime.spawn(task.boxed_local());
    }
}
