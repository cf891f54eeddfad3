use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CachedBody {
    stored_at: Instant,
    body: Arc<str>,
}

impl CachedBody {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Successful response bodies keyed by the full request URL.
///
/// Entries are never mutated, only replaced once expired.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedBody>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, key: &str) -> Option<Arc<str>> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(Instant::now(), self.ttl))
            .map(|entry| Arc::clone(&entry.body))
    }

    pub async fn insert(&self, key: &str, body: Arc<str>) {
        if !self.is_enabled() {
            return;
        }

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        entries.insert(key.to_string(), CachedBody { stored_at: now, body });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
