//! reqwest-backed transport for native builds.

use crate::error::{Result, TransportError};
use crate::transport::{with_cancel, Transport};
use crate::wire::{GraphRequest, GraphResponse, RankingQuery, RankingResponse};
use crate::{endpoint, GRAPH_PATH, RANKING_PATH};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use log::debug;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// HTTP transport talking to the dashboard backend.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn ranking_request(&self, query: &RankingQuery) -> reqwest::RequestBuilder {
        self.client
            .get(endpoint(&self.base_url, RANKING_PATH))
            .query(query)
    }
}

impl Transport for HttpTransport {
    fn get_graph(
        &self,
        request: GraphRequest,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<GraphResponse>> {
        let client = self.client.clone();
        let url = endpoint(&self.base_url, GRAPH_PATH);
        async move {
            debug!("POST {url} {request:?}");
            with_cancel(&cancel, async {
                let response = client.post(&url).json(&request).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(TransportError::Status(status.as_u16()));
                }
                Ok(response.json::<GraphResponse>().await?)
            })
            .await
        }
        .boxed_local()
    }

    fn get_monthly_ranking(
        &self,
        query: RankingQuery,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<RankingResponse>> {
        let request = self.ranking_request(&query);
        async move {
            debug!("GET {RANKING_PATH} {query:?}");
            with_cancel(&cancel, async {
                let response = request.send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(TransportError::Status(status.as_u16()));
                }
                Ok(response.json::<RankingResponse>().await?)
            })
            .await
        }
        .boxed_local()
    }
}
