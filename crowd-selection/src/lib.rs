//! Selection/synchronization engine for the crowd dashboard.
//!
//! The dashboard lets a visitor pick a monitored location, a purpose
//! (which analysis to show), a year and a month. Those four fields live in
//! four places at once: in memory, in the URL query string, in cookies, and
//! in whatever request is currently on the wire. This crate keeps them in
//! agreement.
//!
//! # Architecture
//!
//! Follows the single-threaded WASM pattern of `Rc<RefCell<..>>` shared
//! state with explicit seams for everything the browser provides:
//! - [`PersistentStore`] and [`QueryParams`] for cookies and the URL
//! - [`Viewport`] for the scroll-to-top side effect
//! - [`Runtime`] for spawning tasks and sleeping
//! - [`crowd_api::Transport`] for the network
//!
//! [`SelectionStore`] is the entry point. It owns the selection, runs the
//! bootstrap reconciliation when a page context mounts, and routes every
//! complete selection through a [`RequestCoordinator`] that keeps at most one
//! request live.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = SelectionStore::new(EngineConfig::default(), adapters);
//! store.mount(PageContext::Function);
//! store.set_location("old-town");
//! store.set_month("8");
//! ```

pub mod config;
pub mod context;
pub mod coordinator;
pub mod flight;
pub mod observe;
pub mod payload;
pub mod persistence;
pub mod policy;
pub mod ranking;
pub mod runtime;
pub mod selection;
pub mod store;
pub mod url;

mod bootstrap;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Clock, EngineConfig};
pub use context::{Field, PageContext, ParseContextError};
pub use coordinator::RequestCoordinator;
pub use flight::{FetchRequest, FetchStatus, SingleFlight};
pub use observe::SubscriptionId;
pub use payload::{DataSlot, Dataset, PayloadKind, TrendPurposes};
pub use persistence::{DisabledStore, MemoryStore, NamespacedStore, PersistentStore};
pub use policy::{Policies, PurposePolicy};
pub use ranking::{RankingFeed, RankingState};
pub use runtime::{NoopViewport, Runtime, Viewport};
pub use selection::{ChangingFlag, ChangingFlags, FetchParams, Selection};
pub use store::{Adapters, SelectionStore, SelectionView};
pub use url::{MemoryQuery, QueryParams};

#[cfg(any(test, feature = "native"))]
pub use runtime::TokioRuntime;
