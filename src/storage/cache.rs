//! Day-scoped response cache
//!
//! Upstream read responses are memoized under a key built from the query's
//! identity and the calendar day. A new day yields a new key, so entries
//! never need to be expired. Any storage problem degrades to a cache miss
//! (on read) or is ignored (on write).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::file_io::{read_text, write_text_atomic};
use crate::error::{SyncError, SyncResult};

/// Backing store for cached payloads
pub trait CacheStore {
    /// Payload stored under `key`, if any
    fn get(&self, key: &str) -> SyncResult<Option<String>>;

    /// Store `payload` under `key`, replacing any previous value
    fn put(&self, key: &str, payload: &str) -> SyncResult<()>;
}

/// One file per key in a cache directory, created on first write
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    /// Number of cached entries on disk
    pub fn entry_count(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> SyncResult<Option<String>> {
        read_text(self.entry_path(key))
    }

    fn put(&self, key: &str, payload: &str) -> SyncResult<()> {
        write_text_atomic(self.entry_path(key), payload)
    }
}

/// Cache held in memory (for tests)
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
    offline: bool,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read and write fail
    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    /// Remove every entry, as if the cache directory had been wiped
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Overwrite an entry directly, bypassing the response cache
    pub fn insert_raw(&self, key: &str, payload: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), payload.to_string());
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, key: &str) -> SyncResult<Option<String>> {
        if self.offline {
            return Err(SyncError::Storage("Cache store offline".into()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, payload: &str) -> SyncResult<()> {
        if self.offline {
            return Err(SyncError::Storage("Cache store offline".into()));
        }
        self.insert_raw(key, payload);
        Ok(())
    }
}

/// Identity of an upstream read query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    /// Call kind, e.g. `transactions`
    pub kind: &'static str,
    /// Account scope, e.g. the budget id
    pub scope: String,
    /// Query parameters that change the response, e.g. the since-date
    pub params: Option<String>,
}

impl QueryKey {
    pub fn new(kind: &'static str, scope: impl Into<String>) -> Self {
        Self {
            kind,
            scope: scope.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Cache key for this query on the given day
    pub fn period_key(&self, day: NaiveDate) -> String {
        match &self.params {
            Some(params) => format!(
                "{}_{}_{}_{}",
                self.kind,
                self.scope,
                params,
                day.format("%Y-%m-%d")
            ),
            None => format!("{}_{}_{}", self.kind, self.scope, day.format("%Y-%m-%d")),
        }
    }
}

/// Read-through cache in front of an upstream API
pub struct ResponseCache<S: CacheStore> {
    store: S,
    /// Fixed day for keys; the local calendar day when `None`
    period: Option<NaiveDate>,
}

impl<S: CacheStore> ResponseCache<S> {
    /// Cache keyed on the local calendar day at the time of each call
    pub fn new(store: S) -> Self {
        Self {
            store,
            period: None,
        }
    }

    /// Cache keyed on a fixed day
    pub fn with_period(store: S, day: NaiveDate) -> Self {
        Self {
            store,
            period: Some(day),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn current_period(&self) -> NaiveDate {
        self.period.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Return today's cached response for `query`, or call `fetch` and cache it
    ///
    /// Only errors from `fetch` are returned; cache read and write problems
    /// are logged and absorbed.
    pub fn get_or_fetch<T, F>(&self, query: &QueryKey, fetch: F) -> SyncResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> SyncResult<T>,
    {
        let key = query.period_key(self.current_period());

        match self.store.get(&key) {
            Ok(Some(payload)) => match serde_json::from_str::<T>(&payload) {
                Ok(value) => {
                    info!(kind = query.kind, key = %key, "reading from cache");
                    return Ok(value);
                }
                Err(e) => warn!(key = %key, error = %e, "corrupt cache entry, refetching"),
            },
            Ok(None) => debug!(key = %key, "cache miss"),
            Err(e) => warn!(key = %key, error = %e, "cache read failed, refetching"),
        }

        info!(kind = query.kind, "no cache found, fetching");
        let value = fetch()?;

        match serde_json::to_string(&value) {
            Ok(payload) => {
                if let Err(e) = self.store.put(&key, &payload) {
                    warn!(key = %key, error = %e, "cache write failed, continuing without it");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "response not serializable, not cached"),
        }

        Ok(value)
    }
}
