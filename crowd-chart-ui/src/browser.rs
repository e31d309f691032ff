//! Browser implementations of the selection engine's seams.
//!
//! Every adapter swallows JS failures: a blocked cookie jar or a sandboxed
//! history object degrades to "no value" rather than a panic.

use crowd_selection::{PersistentStore, QueryParams, Runtime, Viewport};
use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, warn};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, UrlSearchParams};

const SECONDS_PER_DAY: u64 = 86_400;

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// Find `key` in a `document.cookie` string.
pub(crate) fn find_cookie(jar: &str, key: &str) -> Option<String> {
    jar.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.to_string())
}

/// Build the `document.cookie` assignment for one value. A zero TTL expires
/// the cookie immediately.
pub(crate) fn cookie_assignment(key: &str, encoded_value: &str, ttl_days: u32) -> String {
    format!(
        "{key}={encoded_value}; max-age={}; path=/; SameSite=Lax",
        u64::from(ttl_days) * SECONDS_PER_DAY
    )
}

/// Persists selections in `document.cookie`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CookieStore;

impl PersistentStore for CookieStore {
    fn read(&self, key: &str) -> Option<String> {
        let jar = html_document()?.cookie().ok()?;
        let raw = find_cookie(&jar, key)?;
        let value = js_sys::decode_uri_component(&raw)
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or(raw);
        (!value.is_empty()).then_some(value)
    }

    fn write(&self, key: &str, value: &str, ttl_days: u32) {
        let Some(doc) = html_document() else {
            return;
        };
        let encoded = String::from(js_sys::encode_uri_component(value));
        let ttl = if value.is_empty() { 0 } else { ttl_days };
        if let Err(err) = doc.set_cookie(&cookie_assignment(key, &encoded, ttl)) {
            warn!("cookie write for {key} failed: {err:?}");
        }
    }
}

/// Reads and rewrites the query string with `history.replaceState`, so
/// selection changes never add history entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryQuery;

impl QueryParams for HistoryQuery {
    fn read_param(&self, key: &str) -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        let params = UrlSearchParams::new_with_str(&search).ok()?;
        params.get(key).filter(|v| !v.is_empty())
    }

    fn write_param(&self, key: &str, value: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(href) = window.location().href() else {
            return;
        };
        let Ok(url) = web_sys::Url::new(&href) else {
            return;
        };
        let params = url.search_params();
        if value.is_empty() {
            params.delete(key);
        } else {
            params.set(key, value);
        }
        let next = url.href();
        if next == href {
            return;
        }
        debug!("replaceState {next}");
        if let Ok(history) = window.history() {
            if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&next)) {
                warn!("replaceState failed: {err:?}");
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowViewport;

impl Viewport for WindowViewport {
    fn scroll_to_top(&self) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
}

/// A sleep whose timer could not be armed must end at once, or every
/// timeout raced against it would hang.
fn timer_scheduled<E>(scheduled: &Option<Result<i32, E>>) -> bool {
    matches!(scheduled, Some(Ok(_)))
}

/// `spawn_local` plus `setTimeout`-backed sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
            if !timer_scheduled(&scheduled) {
                warn!("setTimeout unavailable, {millis}ms sleep ends immediately");
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        async move {
            let _ = JsFuture::from(promise).await;
        }
        .boxed_local()
    }
}
