//! Cache-aside layer in front of the upstream providers
//!
//! Requests are fingerprinted into a fixed-length hex key, looked up in a
//! time-bounded store and written back on a miss. Caching is best effort: any
//! store fault is logged and treated as a miss (on read) or a no-op (on write).

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::task;
use tracing::{debug, warn};

/// Derive a deterministic cache key from a request URL and optional
/// parameters.
///
/// Parameters are serialised to JSON with object keys sorted at every level,
/// so equivalent queries map to the same key regardless of insertion order.
/// Returns `None` if the parameters cannot be serialised.
pub fn fingerprint<P: Serialize + ?Sized>(url: &str, params: Option<&P>) -> Option<String> {
    let mut raw_key = url.to_string();
    if let Some(params) = params {
        let canonical = serde_json::to_value(params)
            .map(canonicalize)
            .and_then(|value| serde_json::to_string(&value));
        match canonical {
            Ok(json) => raw_key.push_str(&json),
            Err(err) => {
                warn!(%err, "cannot serialise cache key parameters");
                return None;
            }
        }
    }
    Some(format!("{:x}", Sha256::digest(raw_key.as_bytes())))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Key/value store with per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value for `key` if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous entry and its expiry.
    async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    expires_at_ms: u64, // Unix timestamp (milliseconds)
}

fn now_ms() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64)
}

/// Persistent store backed by a fjall keyspace.
pub struct FjallStore {
    _db: fjall::Database,
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("responses", fjall::KeyspaceCreateOptions::default)?;
        Ok(FjallStore {
            _db: db,
            store: items,
        })
    }
}

#[async_trait]
impl CacheStore for FjallStore {
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes)?;
        if now_ms()? < entry.expires_at_ms {
            debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            // Left in place; the next write for this key replaces it.
            debug!("Key found but expired");
            Ok(None)
        }
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let ttl_ms = u64::try_from(ttl.as_millis()).map_err(|_| anyhow!("TTL overflow"))?;
        let expires_at_ms = now_ms()?
            .checked_add(ttl_ms)
            .ok_or(anyhow!("TTL overflow"))?;
        let entry = StoredEntry {
            value,
            expires_at_ms,
        };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }
}

/// Best-effort JSON document cache with a single global TTL.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// The configured time-to-live for new entries.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached document for `key`, or `None` on a miss, an expired
    /// entry, or any store fault.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "cache lookup failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(document) => {
                debug!(key, "cache hit");
                Some(document)
            }
            Err(err) => {
                warn!(key, error = %err, "cached document is unreadable, treating as miss");
                None
            }
        }
    }

    /// Persist `document` under `key` for `ttl`. Failures are logged and
    /// swallowed.
    pub async fn store<T: Serialize + ?Sized>(&self, key: &str, document: &T, ttl: Duration) {
        let raw = match serde_json::to_string(document) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "cannot serialise document for caching");
                return;
            }
        };
        match self.store.set_with_expiry(key, raw, ttl).await {
            Ok(()) => debug!(key, ttl_secs = ttl.as_secs(), "response cached"),
            Err(err) => warn!(key, error = %err, "cache write failed"),
        }
    }
}
