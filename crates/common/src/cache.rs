//! Expiring single-value cache cell
//!
//! A `TtlCell` holds one populated value together with the instant it was
//! fetched. Readers within the TTL window share the cached value; the first
//! reader past the window re-runs the populate closure and replaces the slot
//! wholesale. There is no partial update and no explicit refresh API.
//!
//! Concurrent populations are tolerated: the lock is not held across the
//! populate call, so two racing callers may both fetch and the later write
//! wins. That is acceptable because populated values are idempotent
//! projections of external state.

use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Single-value cache with optional time-to-live
///
/// # Type Parameters
/// - `T`: Cached value type (must be `Clone`)
/// - `C`: Clock type for expiry checks (defaults to `SystemClock`)
///
/// A TTL of `None` means the value never expires once populated; this is
/// used for identifiers that are stable for the process lifetime.
pub struct TtlCell<T, C = SystemClock>
where
    T: Clone,
    C: Clock,
{
    slot: Arc<RwLock<Option<CacheEntry<T>>>>,
    clock: C,
}

impl<T: Clone> TtlCell<T, SystemClock> {
    /// Create an empty cell using the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<T: Clone> Default for TtlCell<T, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> TtlCell<T, C>
where
    T: Clone,
    C: Clock,
{
    /// Create an empty cell with a custom clock (useful for testing)
    pub fn with_clock(clock: C) -> Self {
        Self { slot: Arc::new(RwLock::new(None)), clock }
    }

    /// Return the cached value if present and fresh within `ttl`
    pub fn get(&self, ttl: Option<Duration>) -> Option<T> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        let entry = guard.as_ref()?;
        if let Some(ttl) = ttl {
            let age = self.clock.now().duration_since(entry.fetched_at);
            if age >= ttl {
                return None;
            }
        }
        Some(entry.value.clone())
    }

    /// Return the cached value regardless of age (test and diagnostics aid)
    pub fn peek(&self) -> Option<T> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|entry| entry.value.clone())
    }

    /// Replace the slot with a freshly fetched value
    pub fn set(&self, value: T) {
        let entry = CacheEntry { value, fetched_at: self.clock.now() };
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(entry);
    }

    /// Drop the cached value so the next read repopulates
    pub fn invalidate(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Return the cached value if fresh, otherwise run `populate` and store
    /// its result
    ///
    /// The lock is released while `populate` runs, so a failed population
    /// leaves any previously cached (stale) value untouched and a racing
    /// population simply overwrites the slot.
    pub async fn get_or_try_populate<E, F, Fut>(
        &self,
        ttl: Option<Duration>,
        populate: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(ttl) {
            tracing::debug!("ttl cell hit");
            return Ok(value);
        }

        tracing::debug!("ttl cell miss, populating");
        let value = populate().await?;
        self.set(value.clone());
        Ok(value)
    }
}

impl<T, C> Clone for TtlCell<T, C>
where
    T: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { slot: Arc::clone(&self.slot), clock: self.clock.clone() }
    }
}
