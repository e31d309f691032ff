//! Browser adapters and shared Dioxus components for the crowd dashboard.
//!
//! This crate provides:
//! - `browser`: cookie, URL, scroll and timer adapters for the selection engine
//! - `state`: reactive `AppState` mirror plus the `Engine` handle in context
//! - `options`: location and purpose choices offered by the header
//! - `components`: reusable RSX components (selectors, spinners, panels)

pub mod browser;
pub mod components;
pub mod options;
pub mod state;
