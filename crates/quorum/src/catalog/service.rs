//! Single-flight model catalog service.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::models::CatalogModel;

/// Where the model list comes from. Implemented by the (out-of-scope)
/// provider download client; mocked in tests.
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Fetch the current model list from the source.
    async fn fetch_models(&self) -> Result<Vec<CatalogModel>>;
}

/// The error is shared between every waiter of one flight, so it travels
/// behind an `Arc` to keep the future's output `Clone`.
type FetchResult = Result<Vec<CatalogModel>, Arc<anyhow::Error>>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// In-memory model catalog with single-flight refresh.
///
/// The first [`models`] call starts a fetch; callers arriving while it is
/// in flight await the same future instead of issuing their own. A
/// successful fetch is cached for the rest of the session ([`refresh`]
/// forces a new one); a failed fetch clears the flight so the next call
/// can retry.
///
/// [`models`]: ModelCatalog::models
/// [`refresh`]: ModelCatalog::refresh
pub struct ModelCatalog<S> {
    source: Arc<S>,
    cache: RwLock<Option<Vec<CatalogModel>>>,
    /// The in-flight fetch, tagged with a generation so a late waiter
    /// cannot tear down a newer flight it never belonged to.
    inflight: Mutex<Option<(u64, SharedFetch)>>,
    generation: std::sync::atomic::AtomicU64,
}

impl<S: ModelSource + 'static> ModelCatalog<S> {
    /// Create a catalog over the given source. Nothing is fetched until
    /// the first [`ModelCatalog::models`] call.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            cache: RwLock::new(None),
            inflight: Mutex::new(None),
            generation: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// The model list, fetched at most once per session.
    pub async fn models(&self) -> Result<Vec<CatalogModel>> {
        if let Some(models) = self.cache.read().await.as_ref() {
            return Ok(models.clone());
        }
        self.fetch_shared().await
    }

    /// Drop the cache and fetch again. Joins a fetch already in flight
    /// rather than stacking a second one.
    pub async fn refresh(&self) -> Result<Vec<CatalogModel>> {
        *self.cache.write().await = None;
        self.fetch_shared().await
    }

    /// Whether a fetched list is available without touching the source.
    pub async fn is_warm(&self) -> bool {
        self.cache.read().await.is_some()
    }

    async fn fetch_shared(&self) -> Result<Vec<CatalogModel>> {
        let (generation, fetch) = self.join_or_start().await;
        let result = fetch.await;
        self.settle(generation, &result).await;
        result.map_err(|err| anyhow!("model catalog refresh failed: {err:#}"))
    }

    /// Clone the in-flight fetch, or start one if none is running.
    async fn join_or_start(&self) -> (u64, SharedFetch) {
        let mut inflight = self.inflight.lock().await;
        if let Some((generation, fetch)) = inflight.as_ref() {
            return (*generation, fetch.clone());
        }

        let generation = self
            .generation
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        debug!(generation, "starting model catalog fetch");

        let source = Arc::clone(&self.source);
        let fetch = async move { source.fetch_models().await.map_err(Arc::new) }
            .boxed()
            .shared();
        *inflight = Some((generation, fetch.clone()));
        (generation, fetch)
    }

    /// First waiter back retires the flight and fills the cache. The
    /// generation check keeps a stale waiter from clearing a flight
    /// started after its own.
    async fn settle(&self, generation: u64, result: &FetchResult) {
        let mut inflight = self.inflight.lock().await;
        if inflight.as_ref().map(|(g, _)| *g) != Some(generation) {
            return;
        }
        *inflight = None;

        if let Ok(models) = result {
            *self.cache.write().await = Some(models.clone());
        }
    }
}
