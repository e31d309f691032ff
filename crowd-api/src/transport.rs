//! The transport seam between the selection engine and the network.

use crate::error::{Result, TransportError};
use crate::wire::{GraphRequest, GraphResponse, RankingQuery, RankingResponse};
use futures::future::{self, Either, LocalBoxFuture};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Network access used by the selection engine.
///
/// Implementations must observe `cancel` and abort the underlying transport
/// when it fires, resolving to [`TransportError::Canceled`]. Returned futures
/// are `'static` so the engine can spawn them on a single-threaded executor.
pub trait Transport {
    /// Fetch the main dataset for one selection.
    fn get_graph(
        &self,
        request: GraphRequest,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<GraphResponse>>;

    /// Fetch the monthly ranking shown next to the main dataset.
    fn get_monthly_ranking(
        &self,
        query: RankingQuery,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, Result<RankingResponse>>;
}

/// Race `fut` against `cancel`; dropping `fut` on cancellation aborts it.
pub async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(TransportError::Canceled);
    }
    let cancelled = cancel.cancelled();
    futures::pin_mut!(fut, cancelled);
    match future::select(fut, cancelled).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TransportError::Canceled),
    }
}
