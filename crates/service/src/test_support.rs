#![cfg(test)]
//! Doubles and a wired-up fixture for the service tests.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use models::{provider, service};

use crate::cache::{CacheError, CacheStore, MokaCacheStore, ReadThroughCache};
use crate::domain::CreateService;
use crate::errors::ServiceError;
use crate::notifier::{Notification, Notifier, NotifyError};
use crate::offerings::OfferingService;
use crate::providers::ProviderService;
use crate::repo::MemoryStore;
use crate::repository::{NewProvider, NewService, ProviderRepository, ServiceRepository};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::SendFailed("smtp unreachable".into()))
    }
}

pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("down".into()))
    }
    async fn put(&self, _key: &str, _value: String) -> Result<(), CacheError> {
        Err(CacheError::Backend("down".into()))
    }
    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend("down".into()))
    }
    async fn clear(&self) -> Result<(), CacheError> {
        Err(CacheError::Backend("down".into()))
    }
}

/// `MemoryStore` that counts the reads the cache is supposed to absorb.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    provider_lists: AtomicUsize,
    service_details: AtomicUsize,
}

#[async_trait]
impl ProviderRepository for CountingStore {
    async fn list_with_services(&self) -> Result<Vec<(provider::Model, Vec<service::Model>)>, ServiceError> {
        self.provider_lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_with_services().await
    }
    async fn find(&self, id: i32) -> Result<Option<provider::Model>, ServiceError> {
        ProviderRepository::find(&self.inner, id).await
    }
    async fn insert(&self, row: NewProvider) -> Result<provider::Model, ServiceError> {
        ProviderRepository::insert(&self.inner, row).await
    }
    async fn save(&self, row: provider::Model) -> Result<provider::Model, ServiceError> {
        ProviderRepository::save(&self.inner, row).await
    }
    async fn delete_cascade(&self, id: i32) -> Result<u64, ServiceError> {
        self.inner.delete_cascade(id).await
    }
}

#[async_trait]
impl ServiceRepository for CountingStore {
    async fn list_with_provider(&self) -> Result<Vec<(service::Model, provider::Model)>, ServiceError> {
        self.inner.list_with_provider().await
    }
    async fn find_with_provider(&self, id: i32) -> Result<Option<(service::Model, provider::Model)>, ServiceError> {
        self.service_details.fetch_add(1, Ordering::SeqCst);
        self.inner.find_with_provider(id).await
    }
    async fn find(&self, id: i32) -> Result<Option<service::Model>, ServiceError> {
        ServiceRepository::find(&self.inner, id).await
    }
    async fn insert(&self, row: NewService) -> Result<service::Model, ServiceError> {
        ServiceRepository::insert(&self.inner, row).await
    }
    async fn save(&self, row: service::Model) -> Result<service::Model, ServiceError> {
        ServiceRepository::save(&self.inner, row).await
    }
    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        self.inner.delete(id).await
    }
}

pub struct Fixture {
    pub providers: ProviderService,
    pub offerings: OfferingService,
    pub notifier: Arc<RecordingNotifier>,
    pub cache: ReadThroughCache,
    store: Arc<CountingStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let cache = ReadThroughCache::new(Arc::new(MokaCacheStore::new(Duration::from_secs(3600), 1_000)));
        Self::build(cache, notifier.clone(), notifier)
    }

    pub fn with_notifier(sender: Arc<dyn Notifier>) -> Self {
        let cache = ReadThroughCache::new(Arc::new(MokaCacheStore::new(Duration::from_secs(3600), 1_000)));
        Self::build(cache, sender, Arc::new(RecordingNotifier::default()))
    }

    pub fn with_failing_cache() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        Self::build(ReadThroughCache::new(Arc::new(FailingCacheStore)), notifier.clone(), notifier)
    }

    fn build(cache: ReadThroughCache, sender: Arc<dyn Notifier>, notifier: Arc<RecordingNotifier>) -> Self {
        let store = Arc::new(CountingStore::default());
        let providers = ProviderService::new(store.clone(), cache.clone(), sender.clone());
        let offerings = OfferingService::new(store.clone(), store.clone(), cache.clone(), sender, "admin@example.com");
        Self { providers, offerings, notifier, cache, store }
    }

    pub fn provider_list_loads(&self) -> usize {
        self.store.provider_lists.load(Ordering::SeqCst)
    }

    pub fn service_detail_loads(&self) -> usize {
        self.store.service_details.load(Ordering::SeqCst)
    }

    pub async fn create_service(&self, provider_id: i32, name: &str) -> Result<service::Model, ServiceError> {
        self.offerings
            .create(CreateService {
                name: name.into(),
                description: format!("{} description", name),
                price: Decimal::from_str("19.99").unwrap(),
                provider_id,
            })
            .await
    }
}

/// Migrated Postgres connection, or `None` when database tests are disabled.
pub async fn get_db() -> anyhow::Result<Option<sea_orm::DatabaseConnection>> {
    use migration::MigratorTrait;
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}
