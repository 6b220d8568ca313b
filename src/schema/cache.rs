use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{SchemaError, SchemaKey, SchemaSource, ScreenSchema};

/// A schema served from the cache together with the moment it was loaded.
#[derive(Debug, Clone)]
pub struct CachedSchema {
    pub schema: Arc<ScreenSchema>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    schema: Arc<ScreenSchema>,
    cached_at: DateTime<Utc>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Read-through, time-expiring cache in front of a [`SchemaSource`].
///
/// Failed lookups are never stored, so a schema published after a miss is
/// visible on the very next request. Concurrent misses on one key may both read
/// the source; the last insert wins.
pub struct SchemaCache {
    source: Arc<dyn SchemaSource>,
    entries: RwLock<HashMap<SchemaKey, CacheEntry>>,
    ttl: Duration,
}

impl SchemaCache {
    pub fn new(source: Arc<dyn SchemaSource>, ttl: Duration) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, key: &SchemaKey) -> Result<CachedSchema, SchemaError> {
        // Fast path: live entry under the read lock
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.is_live(Instant::now()) {
                    return Ok(CachedSchema {
                        schema: entry.schema.clone(),
                        cached_at: entry.cached_at,
                    });
                }
            }
        }

        debug!("Schema cache miss for {}", key);
        let schema = self.source.read(key).await?;
        Ok(self.set(key.clone(), schema).await)
    }

    /// Stores a schema with the default TTL, replacing any previous entry.
    pub async fn set(&self, key: SchemaKey, schema: ScreenSchema) -> CachedSchema {
        let entry = CacheEntry {
            schema: Arc::new(schema),
            cached_at: Utc::now(),
            expires_at: Instant::now() + self.ttl,
        };
        let cached = CachedSchema {
            schema: entry.schema.clone(),
            cached_at: entry.cached_at,
        };

        self.entries.write().await.insert(key, entry);
        cached
    }

    /// Drops every entry regardless of age.
    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        info!("Schema cache flushed ({} entries)", dropped);
    }

    /// Removes expired entries and returns how many were reclaimed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Screen listings always come straight from the source.
    pub async fn list_screens(&self, version: &str) -> Result<Vec<String>, SchemaError> {
        self.source.list_screens(version).await
    }

    /// Periodically reclaims expired entries until the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else { break };
                let reclaimed = cache.sweep_expired().await;
                if reclaimed > 0 {
                    debug!("Schema cache sweep reclaimed {} entries", reclaimed);
                }
            }
        })
    }
}
