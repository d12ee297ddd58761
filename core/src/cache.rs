//! Time-bounded cache for provider responses.
//!
//! Keys are normalized (trimmed, upper-cased) so `"baw123 "` and `"BAW123"` share an
//! entry. Expired entries are dropped lazily on read or explicitly via
//! [`TtlCache::purge_expired`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

#[derive(Debug)]
struct Entry<V> {
    inserted: Instant,
    value: V,
}

#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: Option<usize>,
    entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: None,
            entries: HashMap::new(),
        }
    }

    /// Bounds the entry count; inserting into a full cache evicts the oldest entry.
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: Some(capacity.max(1)),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let key = normalize_key(key);
        let expired = match self.entries.get(&key) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.inserted) >= self.ttl,
        };
        if expired {
            self.entries.remove(&key);
            None
        } else {
            self.entries.get(&key).map(|entry| entry.value.clone())
        }
    }

    pub fn insert(&mut self, key: &str, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: &str, value: V, now: Instant) {
        let key = normalize_key(key);
        if let Some(capacity) = self.capacity {
            if !self.entries.contains_key(&key) && self.entries.len() >= capacity {
                self.purge_expired_at(now);
                if self.entries.len() >= capacity {
                    self.evict_oldest();
                }
            }
        }
        self.entries.insert(key, Entry { inserted: now, value });
    }

    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted) < ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert_at("baw123", 1, start);

        assert_eq!(cache.get_at("BAW123 ", start + Duration::from_secs(9)), Some(1));
        assert_eq!(cache.get_at("baw123", start + Duration::from_secs(10)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_removes_only_expired() {
        let mut cache = TtlCache::new(Duration::from_secs(5));
        let start = Instant::now();
        cache.insert_at("old", "a", start);
        cache.insert_at("new", "b", start + Duration::from_secs(4));

        assert_eq!(cache.purge_expired_at(start + Duration::from_secs(6)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("NEW", start + Duration::from_secs(6)), Some("b"));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut cache = TtlCache::with_capacity(Duration::from_secs(60), 2);
        let start = Instant::now();
        cache.insert_at("a", 1, start);
        cache.insert_at("b", 2, start + Duration::from_secs(1));
        cache.insert_at("c", 3, start + Duration::from_secs(2));

        let now = start + Duration::from_secs(3);
        assert_eq!(cache.get_at("a", now), None);
        assert_eq!(cache.get_at("b", now), Some(2));
        assert_eq!(cache.get_at("c", now), Some(3));
    }

    #[test]
    fn reinserting_refreshes_entry() {
        let mut cache = TtlCache::with_capacity(Duration::from_secs(5), 1);
        let start = Instant::now();
        cache.insert_at("key", 1, start);
        cache.insert_at("KEY", 2, start + Duration::from_secs(4));
        assert_eq!(cache.get_at("key", start + Duration::from_secs(8)), Some(2));
        cache.clear();
        assert!(cache.is_empty());
    }
}
