//! In-memory cache for slow-changing reference data
//!
//! Employees and locations change rarely and the restlet is slow, so both
//! are kept for a fixed freshness window. Each dataset has its own lock and
//! no lock is ever held across the network call.
//!
//! Concurrent refreshes of the same dataset are not coalesced: readers that
//! all find an expired entry each call the restlet, and the last successful
//! response wins.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use bytes::Bytes;
use log::debug;

use crate::client::{Action, CallContext, RestletApi, RestletRequest};
use crate::error::Result;

/// Freshness window for every cached dataset
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Cached reference datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Employees,
    Locations,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Employees, Dataset::Locations];

    /// Restlet action that fetches this dataset
    pub fn action(&self) -> Action {
        match self {
            Dataset::Employees => Action::Employees,
            Dataset::Locations => Action::Locations,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action().restlet_name())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Bytes,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

type Slot = RwLock<Option<CacheEntry>>;

/// Read-through cache over a restlet gateway.
pub struct ReferenceCache<C: RestletApi> {
    inner: Arc<C>,
    ttl: Duration,
    employees: Slot,
    locations: Slot,
}

impl<C: RestletApi> ReferenceCache<C> {
    pub fn new(inner: Arc<C>) -> Self {
        Self::with_ttl(inner, CACHE_TTL)
    }

    pub fn with_ttl(inner: Arc<C>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            employees: RwLock::new(None),
            locations: RwLock::new(None),
        }
    }

    fn slot(&self, dataset: Dataset) -> &Slot {
        match dataset {
            Dataset::Employees => &self.employees,
            Dataset::Locations => &self.locations,
        }
    }

    /// Payload if cached and still inside the freshness window
    fn fresh(&self, dataset: Dataset) -> Option<Bytes> {
        let guard = self
            .slot(dataset)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.payload.clone())
    }

    fn store(&self, dataset: Dataset, payload: Bytes) {
        let mut guard = self
            .slot(dataset)
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CacheEntry {
            payload,
            fetched_at: Instant::now(),
        });
    }

    /// Serve a dataset, refreshing it from the restlet if stale or absent.
    ///
    /// On failure the cached entry is left exactly as it was and the
    /// gateway error is returned unchanged.
    pub async fn get(&self, ctx: &CallContext, dataset: Dataset) -> Result<Bytes> {
        if let Some(payload) = self.fresh(dataset) {
            debug!("Cache hit: {}", dataset);
            return Ok(payload);
        }

        debug!("Cache miss: {}", dataset);
        let payload = self
            .inner
            .invoke(ctx, RestletRequest::get(dataset.action()))
            .await?;

        self.store(dataset, payload.clone());
        Ok(payload)
    }

    /// Age of the cached entry, fresh or not
    pub fn age(&self, dataset: Dataset) -> Option<Duration> {
        let guard = self
            .slot(dataset)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|entry| entry.fetched_at.elapsed())
    }

    /// Cached payload regardless of freshness
    #[cfg(test)]
    fn peek(&self, dataset: Dataset) -> Option<Bytes> {
        let guard = self.slot(dataset).read().unwrap();
        guard.as_ref().map(|entry| entry.payload.clone())
    }

    /// Pretend the entry was fetched `by` earlier than it was
    #[cfg(test)]
    fn backdate(&self, dataset: Dataset, by: Duration) {
        let mut guard = self.slot(dataset).write().unwrap();
        if let Some(entry) = guard.as_mut() {
            entry.fetched_at = entry
                .fetched_at
                .checked_sub(by)
                .expect("monotonic clock too close to its origin");
        }
    }
}
