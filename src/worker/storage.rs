//! Named cache partitions keyed by request identity.
//!
//! [`CacheStorage`] keeps partitions in creation order, which is the order
//! [`CacheStorage::match_any`] searches them. Each [`Cache`] guards its
//! entries with a [`tokio::sync::RwLock`], so a `put` or `put_all` is
//! atomic with respect to concurrent `match_request` calls.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::request::{FetchRequest, FetchResponse, RequestKey};

/// One named cache partition.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<RequestKey, FetchResponse>>,
}

impl Cache {
    /// Stores `response` under the identity of `request`, replacing any
    /// previous entry.
    pub async fn put(&self, request: &FetchRequest, response: FetchResponse) {
        self.entries.write().await.insert(request.key(), response);
    }

    /// Stores every pair under a single write lock.
    pub async fn put_all(&self, pairs: Vec<(FetchRequest, FetchResponse)>) {
        let mut entries = self.entries.write().await;
        for (request, response) in pairs {
            entries.insert(request.key(), response);
        }
    }

    /// Returns a copy of the entry stored for `request`, if any.
    pub async fn match_request(&self, request: &FetchRequest) -> Option<FetchResponse> {
        self.entries.read().await.get(&request.key()).cloned()
    }

    /// Returns the URLs of every stored entry, sorted.
    pub async fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .entries
            .read()
            .await
            .keys()
            .map(|k| k.url.clone())
            .collect();
        urls.sort();
        urls
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the partition holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// The set of named partitions visible to the worker.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: RwLock<Vec<(String, Arc<Cache>)>>,
}

impl CacheStorage {
    /// Creates storage with no partitions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the partition called `name`, creating it if needed.
    pub async fn open(&self, name: &str) -> Arc<Cache> {
        let mut caches = self.caches.write().await;
        if let Some((_, cache)) = caches.iter().find(|(n, _)| n == name) {
            return Arc::clone(cache);
        }
        let cache = Arc::new(Cache::default());
        caches.push((name.to_string(), Arc::clone(&cache)));
        cache
    }

    /// Returns `true` if a partition called `name` exists.
    pub async fn has(&self, name: &str) -> bool {
        self.caches.read().await.iter().any(|(n, _)| n == name)
    }

    /// Deletes the partition called `name`. Returns `false` if it did not
    /// exist.
    pub async fn delete(&self, name: &str) -> bool {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|(n, _)| n != name);
        caches.len() != before
    }

    /// Returns every partition name in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.caches
            .read()
            .await
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Looks `request` up in every partition, oldest first, and returns the
    /// first hit.
    pub async fn match_any(&self, request: &FetchRequest) -> Option<FetchResponse> {
        let caches: Vec<Arc<Cache>> = self
            .caches
            .read()
            .await
            .iter()
            .map(|(_, c)| Arc::clone(c))
            .collect();
        for cache in caches {
            if let Some(response) = cache.match_request(request).await {
                return Some(response);
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::worker::request::ResponseKind;
    use axum::http::{HeaderMap, StatusCode};
    use bytes::Bytes;

    fn ok(body: &'static str) -> FetchResponse {
        FetchResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
            kind: ResponseKind::Basic,
        }
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let storage = CacheStorage::new();
        let a = storage.open("v1").await;
        let b = storage.open("v1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(storage.keys().await, ["v1"]);
    }

    #[tokio::test]
    async fn match_any_searches_every_partition() {
        let storage = CacheStorage::new();
        let old = storage.open("v0").await;
        let _current = storage.open("v1").await;
        let req = FetchRequest::get("http://localhost/styles.css");
        old.put(&req, ok("old")).await;

        let Some(hit) = storage.match_any(&req).await else {
            panic!("entry stored in v0 must match");
        };
        assert_eq!(hit.body, Bytes::from_static(b"old"));
        assert!(storage.match_any(&FetchRequest::get("http://localhost/other")).await.is_none());
    }

    #[tokio::test]
    async fn delete_drops_partition_and_entries() {
        let storage = CacheStorage::new();
        let cache = storage.open("v0").await;
        let req = FetchRequest::get("http://localhost/");
        cache.put(&req, ok("x")).await;

        assert!(storage.delete("v0").await);
        assert!(!storage.delete("v0").await);
        assert!(!storage.has("v0").await);
        assert!(storage.match_any(&req).await.is_none());
    }

    #[tokio::test]
    async fn put_all_stores_every_pair() {
        let cache = Cache::default();
        cache
            .put_all(vec![
                (FetchRequest::get("http://localhost/a"), ok("a")),
                (FetchRequest::get("http://localhost/b"), ok("b")),
            ])
            .await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.urls().await, ["http://localhost/a", "http://localhost/b"]);
    }
}
