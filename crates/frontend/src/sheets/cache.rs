//! Client-side cache of fetched sheets and month-scoped table
//! configurations.
//!
//! A single shared, clonable service handed to whatever computes
//! derived views. Entries never expire on their own; invalidation is
//! caller-driven (force refresh or periodic refresh). The version
//! counter is an invalidation signal, not a value: dependent
//! computations recompute whenever it moves.
//!
//! The cache does NOT serialize identical concurrent fetches of the
//! same name; two overlapping `load`s of an uncached sheet will both
//! hit the network. What it does guarantee is that a stale completion
//! can never overwrite newer data: every fetch takes a ticket via
//! [`SheetCache::begin_fetch`], and [`SheetCache::put_fetched`] drops
//! results whose ticket has been superseded.
//!
//! Per-entry writes are whole `SheetData` replacements, so no
//! interleaving of `headers` and `rows` from different completions is
//! possible. The lock is only held for map access, never across an
//! await point.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use contracts::config::TableConfig;
use contracts::sheets::SheetData;

#[derive(Default)]
struct Inner {
    entries: HashMap<String, SheetData>,
    /// Latest ticket issued per sheet name.
    fetch_seq: HashMap<String, u64>,
    next_ticket: u64,
    version: u64,
    configs: HashMap<String, TableConfig>,
}

/// Ticket of one in-flight fetch, bound to a sheet name.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    name: String,
    ticket: u64,
}

impl FetchTicket {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Default)]
pub struct SheetCache {
    inner: Arc<RwLock<Inner>>,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SheetData> {
        self.inner.read().expect("cache lock poisoned").entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().expect("cache lock poisoned").entries.contains_key(name)
    }

    /// Monotonic counter signaling "derived views should recompute".
    pub fn version(&self) -> u64 {
        self.inner.read().expect("cache lock poisoned").version
    }

    pub fn bump_version(&self) {
        self.inner.write().expect("cache lock poisoned").version += 1;
    }

    /// Unconditional insert for trusted local writes (e.g. committing
    /// a row after the gateway acknowledged it). Bumps the version.
    pub fn put(&self, name: &str, data: SheetData) {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        inner.entries.insert(name.to_string(), data);
        inner.version += 1;
    }

    /// Register an outgoing fetch. Any ticket issued earlier for the
    /// same name is superseded from this point on.
    pub fn begin_fetch(&self, name: &str) -> FetchTicket {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        inner.fetch_seq.insert(name.to_string(), ticket);
        FetchTicket {
            name: name.to_string(),
            ticket,
        }
    }

    /// Store a fetch result unless the ticket was superseded by a
    /// later fetch of the same name. Returns whether the write was
    /// accepted. Does not bump the version; callers bump once per
    /// batch.
    pub fn put_fetched(&self, ticket: &FetchTicket, data: SheetData) -> bool {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        if inner.fetch_seq.get(&ticket.name) != Some(&ticket.ticket) {
            return false;
        }
        inner.entries.insert(ticket.name.clone(), data);
        true
    }

    pub fn get_config(&self, key: &str) -> Option<TableConfig> {
        self.inner.read().expect("cache lock poisoned").configs.get(key).cloned()
    }

    pub fn put_config(&self, key: &str, config: TableConfig) {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        inner.configs.insert(key.to_string(), config);
        inner.version += 1;
    }

    /// Snapshot of the month-scoped config cache, for session
    /// persistence.
    pub fn configs_snapshot(&self) -> HashMap<String, TableConfig> {
        self.inner.read().expect("cache lock poisoned").configs.clone()
    }

    pub fn restore_configs(&self, configs: HashMap<String, TableConfig>) {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        inner.configs = configs;
        inner.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(marker: &str) -> SheetData {
        SheetData::new(vec![marker.to_string()], Vec::new())
    }

    #[test]
    fn put_bumps_version_monotonically() {
        let cache = SheetCache::new();
        let v0 = cache.version();
        cache.put("BC-T09-2025", sheet("a"));
        let v1 = cache.version();
        cache.put("BC-T09-2025", sheet("b"));
        let v2 = cache.version();
        assert!(v0 < v1 && v1 < v2);
    }

    #[test]
    fn failed_fetch_leaves_prior_entry_untouched() {
        let cache = SheetCache::new();
        cache.put("BC-T09-2025", sheet("old"));
        // A fetch that never completes successfully writes nothing.
        let _ticket = cache.begin_fetch("BC-T09-2025");
        assert_eq!(cache.get("BC-T09-2025").unwrap().headers, vec!["old"]);
    }

    #[test]
    fn stale_completion_is_rejected() {
        let cache = SheetCache::new();
        let first = cache.begin_fetch("BC-T09-2025");
        let second = cache.begin_fetch("BC-T09-2025");
        assert!(cache.put_fetched(&second, sheet("new")));
        assert!(!cache.put_fetched(&first, sheet("old")));
        assert_eq!(cache.get("BC-T09-2025").unwrap().headers, vec!["new"]);
    }

    #[test]
    fn tickets_are_per_name() {
        let cache = SheetCache::new();
        let a = cache.begin_fetch("BC-T09-2025");
        let b = cache.begin_fetch("BF-T09-2025");
        assert!(cache.put_fetched(&a, sheet("a")));
        assert!(cache.put_fetched(&b, sheet("b")));
    }

    #[test]
    fn configs_are_month_scoped() {
        let cache = SheetCache::new();
        assert!(cache.get_config("CONF_T09_2025").is_none());
        cache.put_config("CONF_T09_2025", TableConfig::default());
        assert!(cache.get_config("CONF_T09_2025").is_some());
        assert!(cache.get_config("CONF_T10_2025").is_none());
    }
}
