//! Wire types and transports for the crowd dashboard API.
//!
//! This crate provides:
//! - `wire`: request/response bodies for the graph and ranking endpoints
//! - `transport`: the `Transport` trait the selection engine drives, plus
//!   the cancellation helper every transport shares
//! - `http`: a reqwest client for native builds (feature `api`)
//! - `browser`: a `window.fetch` client for WASM builds

pub mod error;
pub mod transport;
pub mod wire;

#[cfg(all(feature = "api", not(target_arch = "wasm32")))]
pub mod http;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use error::{Result, TransportError};
pub use transport::{with_cancel, Transport};
pub use wire::{GraphRequest, GraphResponse, RankingQuery, RankingResponse};

/// Base URL used when neither the build nor the caller overrides it.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Path of the main dataset endpoint.
pub const GRAPH_PATH: &str = "api/get-graph";

/// Path of the monthly foreigner ranking endpoint.
pub const RANKING_PATH: &str = "api/foreigners/monthly-ranking";

/// Base URL baked in at compile time via `CROWD_API_BASE_URL`, if set.
pub fn base_url() -> &'static str {
    option_env!("CROWD_API_BASE_URL").unwrap_or(DEFAULT_BASE_URL)
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
