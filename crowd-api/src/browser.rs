//! `window.fetch` transport for WASM builds.
//!
//! Cancellation is forwarded to an `AbortController`, so a superseded request
//! is torn down by the browser instead of finishing in the background.

use crate::error::{Result, TransportError};
use crate::transport::Transport;
use crate::wire::{GraphRequest, GraphResponse, RankingQuery, RankingResponse};
use crate::{endpoint, GRAPH_PATH, RANKING_PATH};
use futures::future::{self, Either, LocalBoxFuture};
use futures::FutureExt;
use log::debug;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, Response, UrlSearchParams};

/// Fetch API transport talking to the dashboard backend.
#[derive(Clone)]
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for FetchTransport {
    fn default() -> Self {
        Self::new(crate::base_url())
    }
}

fn js_error(err: JsValue) -> TransportError {
    if let Some(message) = err.as_string() {
        return TransportError::Network(message);
    }
    if let Ok(error) = err.dyn_into::<js_sys::Error>() {
        return TransportError::Network(String::from(error.message()));
    }
    TransportError::Network("fetch failed".to_string())
}

async fn fetch_json<T: DeserializeOwned>(
    url: String,
    method: &'static str,
    body: Option<String>,
    cancel: CancellationToken,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(TransportError::Canceled);
    }
    let window = web_sys::window().ok_or_else(|| TransportError::Network("no window".into()))?;
    let controller = AbortController::new().map_err(js_error)?;

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_signal(Some(&controller.signal()));
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    debug!("{method} {url}");
    let exchange = async {
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let response: Response = value.dyn_into().map_err(js_error)?;
        if !response.ok() {
            return Err(TransportError::Status(response.status()));
        }
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let text = text
            .as_string()
            .ok_or_else(|| TransportError::Decode("body is not text".into()))?;
        Ok(serde_json::from_str::<T>(&text)?)
    };

    let cancelled = cancel.cancelled();
    futures::pin_mut!(exchange, cancelled);
    match future::select(exchange, cancelled).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            controller.abort();
            Err(TransportError::Canceled)
        }
    }
}

impl Transport for FetchTransport {
    fn get_graph(
        &self,
        request: GraphRequest,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<GraphResponse>> {
        let url = endpoint(&self.base_url, GRAPH_PATH);
        async move {
            let body = serde_json::to_string(&request)?;
            fetch_json(url, "POST", Some(body), cancel).await
        }
        .boxed_local()
    }

    fn get_monthly_ranking(
        &self,
        query: RankingQuery,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<RankingResponse>> {
        let base = endpoint(&self.base_url, RANKING_PATH);
        async move {
            let params = UrlSearchParams::new().map_err(js_error)?;
            for (key, value) in query.pairs() {
                params.append(key, &value);
            }
            let url = format!("{base}?{}", String::from(params.to_string()));
            fetch_json(url, "GET", None, cancel).await
        }
        .boxed_local()
    }
}
