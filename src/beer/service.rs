//! Beer Service
//!
//! Read-through access to the upstream source: cache first, then the
//! admission gate, then the upstream itself.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::admission::{AdmissionGate, GateStats};
use crate::beer::{Beer, BeerSource, FakeBeerSource, FilterRequest, Shaper};
use crate::cache::{CacheStats, Lookup, TtlCache};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::tasks::Sweeper;

/// Cached listings are shared, never copied, between hits.
pub type Listing = Arc<Vec<Beer>>;

/// Combined cache and admission statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub cache: CacheStats,
    pub hit_rate: f64,
    pub admission: GateStats,
}

/// Orchestrates cache, admission gate, upstream source and shaper.
pub struct BeerService {
    source: Arc<dyn BeerSource>,
    cache: TtlCache<Listing>,
    gate: AdmissionGate,
    shaper: Shaper,
    sweeper: Mutex<Option<Sweeper>>,
}

impl BeerService {
    // == Constructor ==
    /// Assembles a service from its parts. No sweeper runs until
    /// [`BeerService::with_sweeper`] is called.
    pub fn new(
        source: Arc<dyn BeerSource>,
        cache: TtlCache<Listing>,
        gate: AdmissionGate,
        shaper: Shaper,
    ) -> Self {
        Self {
            source,
            cache,
            gate,
            shaper,
            sweeper: Mutex::new(None),
        }
    }

    /// Builds the service described by `config` around the fake upstream,
    /// with its sweeper running. Must be called from within a tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        let source = FakeBeerSource::new(config.upstream_items)
            .with_latency(config.upstream_latency());

        Self::new(
            Arc::new(source),
            TtlCache::new(config.cache_ttl()),
            AdmissionGate::new(config.rate_limit_burst, config.rate_limit_interval()),
            Shaper::new(config.name_marker.clone()),
        )
        .with_sweeper(config.sweep_interval())
    }

    /// Starts the background sweep for this service's cache.
    pub fn with_sweeper(self, interval: std::time::Duration) -> Self {
        let sweeper = Sweeper::spawn(self.cache.clone(), interval);
        if let Some(previous) = self.sweeper.lock().replace(sweeper) {
            previous.cancel();
        }
        self
    }

    /// Stops the background sweep, if one is running.
    pub async fn stop_sweeper(&self) {
        let sweeper = self.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            sweeper.stop().await;
        }
    }

    pub fn cache(&self) -> &TtlCache<Listing> {
        &self.cache
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    // == Fetch All ==
    /// Lists everything straight from the upstream: no cache, no admission.
    pub async fn fetch_all(&self, cancel: &CancellationToken) -> Result<Vec<Beer>> {
        self.source.list_all(cancel).await.map_err(|err| {
            error!("Upstream listing failed: {}", err);
            ServiceError::from(err)
        })
    }

    // == Fetch Filtered ==
    /// Returns the raw upstream listing for `request`, read through the cache.
    ///
    /// A fresh cache hit skips both the admission gate and the upstream. A
    /// denied admission leaves the cache untouched.
    pub async fn fetch_filtered(
        &self,
        request: &FilterRequest,
        cancel: &CancellationToken,
    ) -> Result<Listing> {
        let key = request.cache_key();

        if let Some(key) = &key {
            match self.cache.get(key).await {
                Lookup::Fresh(listing) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(listing);
                }
                Lookup::Stale => debug!(key = %key, "Cache entry expired"),
                Lookup::Missing => debug!(key = %key, "Cache miss"),
            }
        }

        if !self.gate.allow() {
            warn!("Upstream admission denied");
            return Err(ServiceError::RateLimitExceeded);
        }

        let listing: Listing = Arc::new(self.fetch_all(cancel).await?);

        if let Some(key) = key {
            debug!(key = %key, items = listing.len(), "Caching upstream listing");
            self.cache.set(key, Arc::clone(&listing)).await;
        }

        Ok(listing)
    }

    // == Filtered ==
    /// Fetches through the cache, then shapes the listing for the request.
    ///
    /// The cache holds raw upstream listings, so shaping runs on every call,
    /// hit or miss.
    pub async fn filtered(
        &self,
        request: &FilterRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<Beer>> {
        let listing = self.fetch_filtered(request, cancel).await?;
        Ok(self
            .shaper
            .shape(listing.iter().cloned(), &request.criteria))
    }

    pub async fn stats(&self) -> ServiceStats {
        let cache = self.cache.stats().await;
        ServiceStats {
            hit_rate: cache.hit_rate(),
            cache,
            admission: self.gate.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beer::model::sample_beer;
    use crate::beer::{FilterCriteria, SortOrder};
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // == Test Source ==
    struct CountingSource {
        calls: AtomicUsize,
        latency: Duration,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                latency: Duration::ZERO,
                fail: false,
            })
        }

        fn slow(latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                latency,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                latency: Duration::ZERO,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BeerSource for CountingSource {
        async fn list_all(&self, cancel: &CancellationToken) -> std::result::Result<Vec<Beer>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if cancel.is_cancelled() {
                return Err(UpstreamError::Cancelled);
            }
            if self.fail {
                return Err(UpstreamError::Unavailable("catalogue down".to_string()));
            }
            Ok(vec![
                sample_beer(1, "Ruby IPA", "2016-01", 6.0, &["wolf", "steak"]),
                sample_beer(2, "Lager", "2017-05", 4.5, &["wolf"]),
                sample_beer(3, "Pale Ale", "2018-03", 5.2, &["pizza"]),
                sample_beer(4, "Imperial IPA", "2016-12", 8.5, &["wolf"]),
            ])
        }
    }

    fn service(source: Arc<CountingSource>, burst: u32) -> BeerService {
        BeerService::new(
            source,
            TtlCache::new(Duration::from_secs(120)),
            AdmissionGate::new(burst, Duration::from_secs(60)),
            Shaper::new("ipa"),
        )
    }

    fn defaults() -> FilterRequest {
        FilterRequest::new(FilterCriteria::service_defaults())
    }

    #[tokio::test]
    async fn test_miss_fetches_and_populates_cache() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 10);
        let request = defaults();

        let listing = svc
            .fetch_filtered(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.len(), 4);
        assert_eq!(source.calls(), 1);
        assert!(svc.cache().contains_key(&request.criteria.cache_key()).await);
    }

    #[tokio::test]
    async fn test_hit_skips_gate_and_upstream() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 1);
        let request = defaults();
        let cancel = CancellationToken::new();

        svc.fetch_filtered(&request, &cancel).await.unwrap();
        let admitted = svc.gate().stats().admitted;

        for _ in 0..5 {
            svc.fetch_filtered(&request, &cancel).await.unwrap();
        }

        assert_eq!(source.calls(), 1);
        let gate = svc.gate().stats();
        assert_eq!(gate.admitted, admitted);
        assert_eq!(gate.denied, 0);
    }

    #[tokio::test]
    async fn test_bypass_always_hits_upstream_and_never_caches() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 10);
        let request = FilterRequest::new(FilterCriteria::default());
        let cancel = CancellationToken::new();

        svc.fetch_filtered(&request, &cancel).await.unwrap();
        svc.fetch_filtered(&request, &cancel).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert!(svc.cache().is_empty().await);
        let stats = svc.cache().stats().await;
        assert_eq!(stats.hits + stats.misses, 0, "Store was never consulted");
    }

    #[tokio::test]
    async fn test_denied_admission_leaves_cache_untouched() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 0);

        let result = svc
            .fetch_filtered(&defaults(), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ServiceError::RateLimitExceeded)));
        assert_eq!(source.calls(), 0);
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_and_is_not_cached() {
        let source = CountingSource::failing();
        let svc = service(source.clone(), 10);

        let result = svc
            .fetch_filtered(&defaults(), &CancellationToken::new())
            .await;

        match result {
            Err(ServiceError::Upstream(UpstreamError::Unavailable(msg))) => {
                assert_eq!(msg, "catalogue down")
            }
            other => panic!("unexpected result: {:?}", other.map(|l| l.len())),
        }
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_under_single_token() {
        let source = CountingSource::slow(Duration::from_millis(50));
        let svc = service(source.clone(), 1);
        let request = defaults();
        let cancel = CancellationToken::new();

        let (first, second) = tokio::join!(
            svc.fetch_filtered(&request, &cancel),
            svc.fetch_filtered(&request, &cancel)
        );

        let outcomes = [first, second];
        let admitted = outcomes.iter().filter(|r| r.is_ok()).count();
        let denied = outcomes
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::RateLimitExceeded)))
            .count();
        assert_eq!((admitted, denied), (1, 1));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_refetches() {
        let source = CountingSource::new();
        let svc = BeerService::new(
            source.clone(),
            TtlCache::new(Duration::from_secs(2)),
            AdmissionGate::new(10, Duration::from_secs(60)),
            Shaper::new("ipa"),
        );
        let request = defaults();
        let cancel = CancellationToken::new();

        svc.fetch_filtered(&request, &cancel).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        svc.fetch_filtered(&request, &cancel).await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        svc.fetch_filtered(&request, &cancel).await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(svc.cache().stats().await.expired, 1);
    }

    #[tokio::test]
    async fn test_filtered_shapes_hits_and_misses_alike() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 10);
        let request = FilterRequest::new(FilterCriteria {
            include_only_matching_name: true,
            min_year_exclusive: 2015,
            required_food_pairing: "wolf".to_string(),
            abv_sort_order: SortOrder::Desc,
        });
        let cancel = CancellationToken::new();

        let miss = svc.filtered(&request, &cancel).await.unwrap();
        let hit = svc.filtered(&request, &cancel).await.unwrap();

        let ids: Vec<u32> = miss.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(miss, hit);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_ignores_gate() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 0);
        let cancel = CancellationToken::new();

        for _ in 0..3 {
            assert_eq!(svc.fetch_all(&cancel).await.unwrap().len(), 4);
        }
        assert_eq!(source.calls(), 3);
        assert_eq!(svc.gate().stats().denied, 0);
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_cancellation_reaches_upstream() {
        let source = CountingSource::new();
        let svc = service(source.clone(), 10);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = svc.fetch_filtered(&defaults(), &cancel).await;

        assert!(matches!(
            result,
            Err(ServiceError::Upstream(UpstreamError::Cancelled))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_lifecycle() {
        let source = CountingSource::new();
        let svc = BeerService::new(
            source,
            TtlCache::new(Duration::from_secs(1)),
            AdmissionGate::new(10, Duration::from_secs(60)),
            Shaper::new("ipa"),
        )
        .with_sweeper(Duration::from_secs(1));

        svc.fetch_filtered(&defaults(), &CancellationToken::new())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(svc.cache().is_empty().await);

        svc.stop_sweeper().await;
        svc.stop_sweeper().await;
    }
}
