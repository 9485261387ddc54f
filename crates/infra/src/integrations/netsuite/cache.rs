//! Lookup caches for ERP reference data
//!
//! Vendor and ledger-account lists are full paginated scans, expensive
//! enough to cache for 30 minutes. The attachments folder id is stable
//! for the process lifetime and cached without expiry. All three cells
//! are owned by the client instance rather than living as module-level
//! globals, so dependent workflows receive them by reference.

use std::time::Duration;

use casebridge_common::TtlCell;
use casebridge_domain::{LedgerAccount, Vendor};

/// Default TTL for the vendor and ledger-account lists (30 minutes)
///
/// Override via `NETSUITE_LOOKUP_TTL_SECONDS` environment variable
pub const DEFAULT_LOOKUP_TTL_SECONDS: u64 = 30 * 60;

/// Lookup cache configuration
#[derive(Debug, Clone)]
pub struct LookupCacheConfig {
    /// Time-to-live for the vendor and account lists
    pub ttl: Duration,
}

impl Default for LookupCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(
                std::env::var("NETSUITE_LOOKUP_TTL_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LOOKUP_TTL_SECONDS),
            ),
        }
    }
}

impl LookupCacheConfig {
    /// Create config with custom TTL (useful for testing)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }
}

/// The three cache cells owned by a `NetSuiteClient`
///
/// Population races under concurrent callers are tolerated: results are
/// idempotent projections of external state and the later write wins.
pub(crate) struct LookupCaches {
    config: LookupCacheConfig,
    pub(crate) vendors: TtlCell<Vec<Vendor>>,
    pub(crate) accounts: TtlCell<Vec<LedgerAccount>>,
    /// File-cabinet folder id; no expiry once resolved
    pub(crate) folder_id: TtlCell<String>,
}

impl LookupCaches {
    pub(crate) fn new(config: LookupCacheConfig) -> Self {
        tracing::debug!(ttl_seconds = config.ttl.as_secs(), "lookup cache configuration loaded");
        Self {
            config,
            vendors: TtlCell::new(),
            accounts: TtlCell::new(),
            folder_id: TtlCell::new(),
        }
    }

    /// TTL applied to the vendor and account lists
    pub(crate) fn list_ttl(&self) -> Option<Duration> {
        Some(self.config.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_thirty_minutes() {
        // Avoid reading the environment in tests; construct explicitly
        let config = LookupCacheConfig::with_ttl(Duration::from_secs(DEFAULT_LOOKUP_TTL_SECONDS));
        assert_eq!(config.ttl, Duration::from_secs(1800));
    }

    #[test]
    fn caches_start_empty() {
        let caches = LookupCaches::new(LookupCacheConfig::with_ttl(Duration::from_secs(60)));
        assert_eq!(caches.vendors.peek(), None);
        assert_eq!(caches.accounts.peek(), None);
        assert_eq!(caches.folder_id.peek(), None);
    }
}
