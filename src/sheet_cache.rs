//! Read-through cache in front of the sheet reader, keyed by
//! (spreadsheet key, tab name) with a fixed expiry. Entries are only
//! dropped wholesale by the explicit refresh action; expiry just means the
//! next read refetches.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::sheets::{self, TableFetch};
use crate::tables::RawTable;

const DEFAULT_TTL_SECS: u64 = 300;

static CACHE: Mutex<Option<HashMap<(String, String), CacheEntry>>> = Mutex::new(None);

#[derive(Debug, Clone)]
enum CachedFetch {
    Table(RawTable),
    Unavailable,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetch: CachedFetch,
    fetched_at: Instant,
}

pub fn ttl() -> Duration {
    let secs = std::env::var("SHEETS_CACHE_TTL_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_SECS);
    Duration::from_secs(secs.max(1))
}

/// Required-table read: errors propagate and are never cached, so a user
/// retry refetches immediately.
pub fn read_table_cached(spreadsheet_key: &str, tab: &str) -> Result<RawTable> {
    if let Some(CachedFetch::Table(table)) = lookup(spreadsheet_key, tab) {
        return Ok(table);
    }
    let table = sheets::read_table(spreadsheet_key, tab)?;
    store(spreadsheet_key, tab, CachedFetch::Table(table.clone()));
    Ok(table)
}

/// Optional-table read: unavailability degrades to `Unavailable` and is
/// cached for the TTL window just like a successful read.
pub fn read_table_cached_opt(spreadsheet_key: &str, tab: &str) -> TableFetch {
    match lookup(spreadsheet_key, tab) {
        Some(CachedFetch::Table(table)) => return TableFetch::Loaded(table),
        Some(CachedFetch::Unavailable) => return TableFetch::Unavailable,
        None => {}
    }
    let fetch = sheets::read_table_opt(spreadsheet_key, tab);
    let cached = match &fetch {
        TableFetch::Loaded(table) => CachedFetch::Table(table.clone()),
        TableFetch::Unavailable => CachedFetch::Unavailable,
    };
    store(spreadsheet_key, tab, cached);
    fetch
}

/// Clear-all invalidation, triggered only by the user's refresh action.
pub fn clear() {
    let mut guard = CACHE.lock().expect("sheet cache lock poisoned");
    if let Some(cache) = guard.as_mut() {
        cache.clear();
    }
}

fn lookup(spreadsheet_key: &str, tab: &str) -> Option<CachedFetch> {
    let guard = CACHE.lock().expect("sheet cache lock poisoned");
    let cache = guard.as_ref()?;
    let entry = cache.get(&(spreadsheet_key.to_string(), tab.to_string()))?;
    if entry.fetched_at.elapsed() >= ttl() {
        return None;
    }
    Some(entry.fetch.clone())
}

fn store(spreadsheet_key: &str, tab: &str, fetch: CachedFetch) {
    let mut guard = CACHE.lock().expect("sheet cache lock poisoned");
    let cache = guard.get_or_insert_with(HashMap::new);
    cache.insert(
        (spreadsheet_key.to_string(), tab.to_string()),
        CacheEntry {
            fetch,
            fetched_at: Instant::now(),
        },
    );
}
