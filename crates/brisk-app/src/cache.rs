//! In-process key/value cache of JSON values.
//!
//! Entries expire after their TTL and the oldest entry is evicted once the
//! capacity is reached. Expired entries are dropped lazily on access.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::CacheConfig;

#[derive(Debug)]
pub struct Cache {
    inner: Mutex<CacheInner>,
    default_ttl: Duration,
}

#[derive(Debug)]
struct CacheInner {
    capacity: usize,
    map: HashMap<String, Entry>,
    order: VecDeque<String>,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

impl Cache {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                capacity,
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            default_ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl())
    }

    /// Returns the value under `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        let expired = match inner.map.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.remove(key);
        }
        None
    }

    /// Returns the value under `key` decoded as `T`.
    ///
    /// A value that does not decode as `T` is treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!(key, error = %err, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> serde_json::Result<()> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };

        let mut inner = self.lock();
        if inner.map.insert(key.to_string(), entry).is_some() {
            inner.remove_from_order(key);
        }
        inner.order.push_back(key.to_string());
        inner.evict_if_needed();
        Ok(())
    }

    /// Removes `key`, returning its value if it was present and live.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let entry = self.lock().remove(key)?;
        entry.is_live(Instant::now()).then_some(entry.value)
    }

    /// Number of stored entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.order.clear();
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheInner {
    fn remove(&mut self, key: &str) -> Option<Entry> {
        let removed = self.map.remove(key);
        if removed.is_some() {
            self.remove_from_order(key);
        }
        removed
    }

    fn remove_from_order(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k.as_str() == key) {
            let _ = self.order.remove(pos);
        }
    }

    fn evict_if_needed(&mut self) {
        while self.map.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
        }
    }
}
