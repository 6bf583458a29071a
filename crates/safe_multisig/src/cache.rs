use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use std::{
    collections::HashMap,
    hash::Hash,
    time::{Duration, Instant},
};

use crate::consts::DEFAULT_CACHE_TTL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries older than this are treated as absent.
    #[serde(with = "duration_secs")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_CACHE_TTL }
    }
}

/// Short-lived, explicitly invalidated cache. Never a source of truth.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        Self { ttl: config.ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((inserted, value)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.lock().insert(key, (Instant::now(), value));
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.lock().remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire() {
        let cache = TtlCache::new(CacheConfig { ttl: Duration::from_millis(20) });
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn explicit_invalidation() {
        let cache = TtlCache::new(CacheConfig::default());
        cache.insert((1u64, "x"), 1);
        cache.insert((1u64, "y"), 2);
        cache.insert((5u64, "x"), 3);

        cache.invalidate(&(1, "x"));
        assert_eq!(cache.get(&(1, "x")), None);
        assert_eq!(cache.get(&(1, "y")), Some(2));
        assert_eq!(cache.get(&(5, "x")), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn config_ttl_is_in_seconds() {
        let config: CacheConfig = serde_json::from_str(r#"{"ttl": 30}"#).unwrap();
        assert_eq!(config.ttl, Duration::from_secs(30));
    }
}
