use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use moka::future::Cache;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::errors::ChainError;
use super::reader::RegistryReader;
use super::types::{Petition, RegistryConfig};
use crate::observability::rpc_metrics;

/// Read allowance for a shared RPC endpoint
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    pub requests_per_second: u32,
    pub burst: u32,
    pub record_ttl: Duration,
}

impl Default for ReadLimits {
    fn default() -> Self {
        // Public World Chain endpoints throttle aggressively; listing pages read
        // one record per call, so keep a small burst and a short record TTL.
        Self {
            requests_per_second: 5,
            burst: 10,
            record_ttl: Duration::from_secs(15),
        }
    }
}

/// Rate-limited, caching wrapper around any [`RegistryReader`].
///
/// Petition records are cached for a short TTL and dropped explicitly after a
/// successful support. Token decimals never change and are cached for the
/// process lifetime. Balances and counters always go to the endpoint.
pub struct ThrottledReader<R> {
    inner: R,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    records: Cache<u64, Petition>,
    decimals: Cache<Address, u8>,
}

impl<R: RegistryReader> ThrottledReader<R> {
    pub fn new(inner: R, limits: ReadLimits) -> Self {
        let per_second = NonZeroU32::new(limits.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(limits.burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        let records = Cache::builder()
            .max_capacity(1000)
            .time_to_live(limits.record_ttl)
            .build();
        let decimals = Cache::builder().max_capacity(16).build();

        Self {
            inner,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            records,
            decimals,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn throttle(&self) {
        if self.rate_limiter.check().is_err() {
            rpc_metrics().record_rate_limit_wait();
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
                .await;
        }
        rpc_metrics().record_request();
    }

    fn observe<T>(&self, result: Result<T, ChainError>) -> Result<T, ChainError> {
        if result.is_err() {
            rpc_metrics().record_error();
        }
        result
    }
}

#[async_trait]
impl<R: RegistryReader> RegistryReader for ThrottledReader<R> {
    async fn petition_count(&self) -> Result<u64, ChainError> {
        self.throttle().await;
        self.observe(self.inner.petition_count().await)
    }

    async fn petition(&self, id: u64) -> Result<Petition, ChainError> {
        if let Some(cached) = self.records.get(&id).await {
            debug!(petition_id = id, "Cache hit for petition record");
            rpc_metrics().record_cache_hit();
            return Ok(cached);
        }
        rpc_metrics().record_cache_miss();

        self.throttle().await;
        let petition = self.observe(self.inner.petition(id).await)?;
        self.records.insert(id, petition.clone()).await;
        Ok(petition)
    }

    async fn last_petition_id(&self) -> Result<u64, ChainError> {
        self.throttle().await;
        self.observe(self.inner.last_petition_id().await)
    }

    async fn registry_config(&self) -> Result<RegistryConfig, ChainError> {
        self.throttle().await;
        self.observe(self.inner.registry_config().await)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        self.throttle().await;
        self.observe(self.inner.token_balance(token, owner).await)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError> {
        if let Some(cached) = self.decimals.get(&token).await {
            rpc_metrics().record_cache_hit();
            return Ok(cached);
        }
        rpc_metrics().record_cache_miss();

        self.throttle().await;
        let decimals = self.observe(self.inner.token_decimals(token).await)?;
        self.decimals.insert(token, decimals).await;
        Ok(decimals)
    }

    async fn forget_petition(&self, id: u64) {
        self.records.invalidate(&id).await;
        self.inner.forget_petition(id).await;
        debug!(petition_id = id, "Dropped cached petition record");
    }
}
