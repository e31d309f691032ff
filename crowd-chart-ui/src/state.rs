//! Application state managed via Dioxus context.
//!
//! The selection engine owns the truth; `AppState` is a reactive mirror of
//! its read model. Components read `AppState` signals to render and call
//! setters on the [`Engine`] from context to change anything.

use crate::browser::{BrowserRuntime, CookieStore, HistoryQuery, WindowViewport};
use crowd_api::Transport;
use crowd_selection::{
    Adapters, DisabledStore, EngineConfig, PageContext, PersistentStore, RankingFeed,
    RankingState, Runtime, SelectionStore, SelectionView,
};
use dioxus::prelude::*;
use std::rc::Rc;

/// Reactive mirror of the engine's read models.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Latest selection snapshot
    pub view: Signal<SelectionView>,
    /// Latest ranking panel snapshot
    pub ranking: Signal<RankingState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: Signal::new(SelectionView::default()),
            ranking: Signal::new(RankingState::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The selection store and the ranking feed of one page.
#[derive(Clone)]
pub struct Engine {
    pub store: SelectionStore,
    pub ranking: RankingFeed,
}

#[cfg(target_arch = "wasm32")]
fn default_transport() -> Rc<dyn Transport> {
    Rc::new(crowd_api::browser::FetchTransport::default())
}

#[cfg(not(target_arch = "wasm32"))]
fn default_transport() -> Rc<dyn Transport> {
    Rc::new(crowd_api::http::HttpTransport::new(crowd_api::base_url()))
}

fn cookie_jar() -> Rc<dyn PersistentStore> {
    let has_document = web_sys::window().and_then(|w| w.document()).is_some();
    if has_document {
        Rc::new(CookieStore)
    } else {
        log::warn!("no document, selections will not be persisted");
        Rc::new(DisabledStore)
    }
}

impl Engine {
    /// Wire the engine to the current browser window.
    pub fn browser(config: EngineConfig) -> Self {
        let transport = default_transport();
        let runtime: Rc<dyn Runtime> = Rc::new(BrowserRuntime);
        let ranking = RankingFeed::new(
            Rc::clone(&transport),
            Rc::clone(&runtime),
            config.request_timeout,
        );
        let adapters = Adapters {
            transport,
            store: cookie_jar(),
            query: Rc::new(HistoryQuery),
            viewport: Rc::new(WindowViewport),
            runtime,
        };
        Self {
            store: SelectionStore::new(config, adapters),
            ranking,
        }
    }

    pub fn teardown(&self) {
        self.store.teardown();
        self.ranking.cancel();
    }
}

/// Provide `AppState` and an `Engine` to the component tree and mount the
/// engine for `context`. Call once from the page's root component.
pub fn use_selection_engine(context: PageContext) -> Engine {
    let state = use_context_provider(AppState::new);
    let engine = use_context_provider(|| Engine::browser(EngineConfig::default()));

    use_hook({
        let engine = engine.clone();
        move || {
            let view = state.view;
            engine.store.subscribe(move |snapshot| {
                let mut view = view;
                view.set(snapshot.clone());
            });
            let ranking = state.ranking;
            engine.ranking.subscribe(move |snapshot| {
                let mut ranking = ranking;
                ranking.set(snapshot.clone());
            });
        }
    });

    use_effect({
        let engine = engine.clone();
        move || {
            engine.store.mount(context);
        }
    });

    use_drop({
        let engine = engine.clone();
        move || engine.teardown()
    });

    engine
}
