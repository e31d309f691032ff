//! Mount-time reconciliation of URL, persisted values and defaults.

use crate::context::{Field, PageContext};
use crate::flight::FetchRequest;
use crate::payload::DataSlot;
use crate::persistence::NamespacedStore;
use crate::selection::{ChangingFlags, FetchParams, Selection};
use crate::store::SelectionStore;
use chrono::Datelike;
use crowd_utils::dates::default_month_for;
use log::{debug, info, warn};
use std::cell::Cell;

/// Holds the `bootstrapping` flag up for the duration of one pass.
struct BootstrapGuard<'a>(&'a Cell<bool>);

impl<'a> BootstrapGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for BootstrapGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SelectionStore {
    /// Activate `context`: reconcile every field from URL, persisted store
    /// and defaults, write the result back to both, and fetch once if the
    /// selection is complete.
    ///
    /// Returns the issued request. A call made while another pass is running
    /// (for instance from a subscriber) does nothing and returns `None`.
    pub fn mount(&self, context: PageContext) -> Option<FetchRequest<FetchParams>> {
        let inner = &self.inner;
        let Some(_guard) = BootstrapGuard::enter(&inner.bootstrapping) else {
            debug!("bootstrap for {context} skipped, another pass is running");
            return None;
        };
        info!("bootstrap {context}");

        inner.coordinator.cancel();
        {
            let mut state = inner.state.borrow_mut();
            state.context = context;
            state.selection = Selection::default();
            state.data = DataSlot::Empty;
            state.error = None;
            state.loading = false;
            state.changing = ChangingFlags::default();
            state.bootstrapped = false;
        }

        let query = inner.adapters.query.as_ref();
        let persisted = NamespacedStore::new(inner.adapters.store.as_ref(), context);
        let lookup = |field: Field| {
            query
                .read_param(field.key())
                .or_else(|| persisted.read(field.key()))
        };

        let today = inner.config.clock.today();
        let location = lookup(Field::Location).unwrap_or_default();
        let year = lookup(Field::Year).unwrap_or_else(|| today.year().to_string());
        let month = lookup(Field::Month).unwrap_or_else(|| default_month_for(&year, today));
        let requested = lookup(Field::Purpose).unwrap_or_default();
        let (purpose, corrected) = inner.config.policies.resolve(&requested, context);
        if corrected && !requested.is_empty() {
            warn!("purpose {requested:?} is not offered on {context}, using {purpose:?}");
        }

        let selection = Selection {
            location,
            purpose,
            year,
            month,
        };
        // Also covers the write-back of a corrected purpose.
        for field in Field::ALL {
            let value = selection.get(field);
            query.write_param(field.key(), value);
            if !value.is_empty() {
                persisted.write(field.key(), value, inner.ttl_for(value));
            }
        }

        let params = selection.fetch_params();
        {
            let mut state = inner.state.borrow_mut();
            state.selection = selection;
            state.bootstrapped = true;
        }

        let request = params.map(|params| self.fetch(params));
        if request.is_none() {
            debug!("selection incomplete after bootstrap, nothing to fetch");
        }
        inner.notify();
        request
    }

    /// Move to another page context. Re-runs [`mount`](Self::mount) unless
    /// `context` is already active.
    pub fn switch_context(&self, context: PageContext) -> Option<FetchRequest<FetchParams>> {
        let state = self.inner.state.borrow();
        if state.bootstrapped && state.context == context {
            return None;
        }
        drop(state);
        self.mount(context)
    }
}

#[cfg(test)]
mod tests {
    use crate::context::PageContext;
    use crate::flight::FetchStatus;
    use crate::persistence::{MemoryStore, PersistentStore};
    use crate::testing::{harness, harness_with, settle};
    use crate::url::{MemoryQuery, QueryParams};
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn remount_restores_persisted_values() {
        LocalSet::new()
            .run_until(async {
                let cookies = Rc::new(MemoryStore::new());
                let h = harness_with(Rc::clone(&cookies), Rc::new(MemoryQuery::new()));
                h.store.mount(PageContext::Function);
                h.store.set_location("honmachi3");
                h.store.set_purpose("wti_cog");
                h.store.set_year_month("2023", "11");
                settle().await;
                h.store.teardown();

                let again = harness_with(Rc::clone(&cookies), Rc::new(MemoryQuery::new()));
                let request = again.store.mount(PageContext::Function).unwrap();
                let sel = again.store.selection();
                assert_eq!(sel.location, "honmachi3");
                assert_eq!(sel.purpose, "wti_cog");
                assert_eq!((sel.year.as_str(), sel.month.as_str()), ("2023", "11"));
                assert_eq!(request.settled().await, FetchStatus::Resolved);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn url_wins_over_cookie_and_overwrites_it() {
        LocalSet::new()
            .run_until(async {
                let cookies = Rc::new(MemoryStore::new());
                cookies.write("function_location", "station", 30);
                cookies.write("function_month", "3", 30);
                let query = Rc::new(MemoryQuery::from_query("?location=jinnya"));
                let h = harness_with(Rc::clone(&cookies), Rc::clone(&query));

                h.store.mount(PageContext::Function);

                assert_eq!(h.store.selection().location, "jinnya");
                assert_eq!(h.store.selection().month, "3");
                assert_eq!(cookies.read("function_location").as_deref(), Some("jinnya"));
                assert_eq!(query.read_param("month").as_deref(), Some("3"));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn purpose_from_other_context_falls_back_to_default() {
        LocalSet::new()
            .run_until(async {
                let cookies = Rc::new(MemoryStore::new());
                let query = Rc::new(MemoryQuery::from_query("?location=station&action=dti_cog"));
                let h = harness_with(Rc::clone(&cookies), Rc::clone(&query));

                h.store.mount(PageContext::Purpose);

                assert_eq!(h.store.selection().purpose, "cal_holiday");
                assert_eq!(query.read_param("action").as_deref(), Some("cal_holiday"));
                assert_eq!(cookies.read("purpose_action").as_deref(), Some("cal_holiday"));
                settle().await;
                let call = h.transport.calls().pop().unwrap();
                assert_eq!(call.request.action, "cal_holiday");
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn defaults_follow_the_clock() {
        LocalSet::new()
            .run_until(async {
                let h = harness("");
                let request = h.store.mount(PageContext::Function);
                let sel = h.store.selection();
                assert_eq!(sel.location, "");
                assert_eq!(sel.purpose, "cal_cog");
                assert_eq!((sel.year.as_str(), sel.month.as_str()), ("2025", "5"));
                assert!(request.is_none());
                assert_eq!(h.query.to_query_string(), "action=cal_cog&month=5&year=2025");

                let h = harness("?year=2023");
                h.store.mount(PageContext::Default);
                let sel = h.store.selection();
                assert_eq!(sel.month, "12");
                assert_eq!(sel.purpose, "");
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn bootstrap_fetches_exactly_once() {
        LocalSet::new()
            .run_until(async {
                let h = harness("?location=station&action=cal_cog&year=2024&month=7");
                let store = h.store.clone();
                let nested = Rc::new(Cell::new(0));
                let counter = Rc::clone(&nested);
                let id = h.store.subscribe(move |_| {
                    if store.mount(PageContext::Function).is_none() {
                        counter.set(counter.get() + 1);
                    }
                });

                h.store.mount(PageContext::Function);
                h.store.unsubscribe(id);
                settle().await;
                assert_eq!(h.transport.calls().len(), 1);
                assert_eq!(nested.get(), 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn switching_context_resets_and_cancels() {
        LocalSet::new()
            .run_until(async {
                let h = harness("?location=station&action=cal_cog&year=2024&month=7");
                let first = h.store.mount(PageContext::Function).unwrap();
                assert!(h.store.switch_context(PageContext::Function).is_none());

                let second = h.store.switch_context(PageContext::Purpose).unwrap();
                assert_eq!(first.status(), FetchStatus::Canceled);
                assert_eq!(second.params().purpose, "cal_holiday");
                assert_eq!(h.store.context(), PageContext::Purpose);
                assert!(h.store.view().data.is_empty());

                settle().await;
                assert_eq!(second.status(), FetchStatus::Resolved);
                assert_eq!(h.transport.calls().len(), 2);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn bootstrap_does_not_persist_through_setters_early() {
        LocalSet::new()
            .run_until(async {
                let h = harness("");
                h.store.set_location("station");
                assert_eq!(h.cookies.write_count(), 0);
                assert_eq!(h.query.read_param("location").as_deref(), Some("station"));
            })
            .await;
    }
}
