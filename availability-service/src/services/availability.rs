use crate::models::{AvailabilityResult, ProductQuery};
use crate::services::{CheckError, ProductStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

/// Maps a normalized query to an availability outcome with one bounded
/// store lookup.
#[derive(Clone)]
pub struct AvailabilityResolver {
    store: Arc<dyn ProductStore>,
    timeout: Duration,
}

impl AvailabilityResolver {
    pub fn new(store: Arc<dyn ProductStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    pub async fn resolve(&self, query: &ProductQuery) -> Result<AvailabilityResult, CheckError> {
        if query.is_blank() {
            return Ok(AvailabilityResult::Blank);
        }

        let exists = tokio::time::timeout(self.timeout, self.store.exists(query.product_name()))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))??;

        Ok(if exists {
            AvailabilityResult::Ready
        } else {
            AvailabilityResult::Unavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryProductStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups and fails each one.
    #[derive(Default)]
    struct FailingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for FailingStore {
        async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    struct SlowStore;

    #[async_trait]
    impl ProductStore for SlowStore {
        async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(true)
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn resolver(store: Arc<dyn ProductStore>) -> AvailabilityResolver {
        AvailabilityResolver::new(store, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_existing_product_is_ready() {
        let resolver = resolver(Arc::new(InMemoryProductStore::with_products(["keychain"])));
        let result = resolver.resolve(&ProductQuery::new("KEYCHAIN")).await.unwrap();
        assert_eq!(result, AvailabilityResult::Ready);
    }

    #[tokio::test]
    async fn test_absent_product_is_unavailable() {
        let resolver = resolver(Arc::new(InMemoryProductStore::with_products(["keychain"])));
        let result = resolver.resolve(&ProductQuery::new("doesntexist")).await.unwrap();
        assert_eq!(result, AvailabilityResult::Unavailable);
    }

    #[tokio::test]
    async fn test_blank_query_skips_store() {
        let store = Arc::new(FailingStore::default());
        let resolver = resolver(store.clone());

        let result = resolver.resolve(&ProductQuery::new("   ")).await.unwrap();

        assert_eq!(result, AvailabilityResult::Blank);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = Arc::new(FailingStore::default());
        let resolver = resolver(store.clone());

        let err = resolver.resolve(&ProductQuery::new("keychain")).await.unwrap_err();

        assert!(matches!(err, CheckError::Store(StoreError::Unavailable(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let resolver = AvailabilityResolver::new(Arc::new(SlowStore), Duration::from_millis(20));

        let err = resolver.resolve(&ProductQuery::new("keychain")).await.unwrap_err();

        assert!(matches!(err, CheckError::Store(StoreError::Timeout(_))));
    }
}
