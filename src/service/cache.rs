//! Historical-volatility result cache
//!
//! In-memory, TTL-bounded, single-flight: concurrent requests for the same
//! key share one in-flight computation instead of recomputing. Realized vol
//! for a closed trading day never changes, so entries are safe to reuse
//! until the as-of date in the key rolls over (the TTL is a backstop).

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::OnceCell;

use crate::core::{Estimator, VolResult, VolatilityEstimate};

/// Cache tuning knobs.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether to use the cache at all
    pub enabled: bool,
    /// Maximum entry age before recomputation
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Cache key: one estimate per (symbol, window, method, as-of date).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HvKey {
    pub symbol: String,
    pub window: usize,
    pub method: Estimator,
    pub as_of: NaiveDate,
}

struct Entry {
    created: Instant,
    cell: Arc<OnceCell<VolatilityEstimate>>,
}

/// Single-flight TTL cache for historical-volatility estimates.
pub struct HvCache {
    config: CacheConfig,
    entries: Mutex<HashMap<HvKey, Entry>>,
}

impl HvCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached estimate for `key`, or run `compute` to fill it.
    ///
    /// At most one computation per key is in flight: late arrivals await the
    /// leader's cell. A failed computation leaves the cell empty, so the
    /// next request retries; errors are never cached. If the leader is
    /// cancelled (request timeout), one of the waiters takes over.
    pub async fn get_or_compute<F, Fut>(&self, key: HvKey, compute: F) -> VolResult<VolatilityEstimate>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = VolResult<VolatilityEstimate>>,
    {
        if !self.config.enabled {
            return compute().await;
        }

        let cell = {
            let mut entries = self.entries.lock().expect("cache lock poisoned");
            // Drop initialized entries past their TTL; in-flight entries are
            // young by construction and survive.
            let ttl = self.config.ttl;
            entries.retain(|_, e| e.created.elapsed() < ttl);

            entries
                .entry(key.clone())
                .or_insert_with(|| Entry {
                    created: Instant::now(),
                    cell: Arc::new(OnceCell::new()),
                })
                .cell
                .clone()
        };

        if let Some(hit) = cell.get() {
            tracing::debug!(symbol = %key.symbol, window = key.window, method = %key.method, "historical vol cache hit");
            return Ok(hit.clone());
        }

        cell.get_or_try_init(compute).await.cloned()
    }

    /// Number of live entries (initialized or in flight).
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
