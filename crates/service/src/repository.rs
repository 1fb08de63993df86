use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use models::{provider, service};

use crate::errors::ServiceError;

/// Row to insert; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub provider_id: i32,
    pub now: DateTime<FixedOffset>,
}

/// Persistence for providers.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Every provider with its services, both ordered by id.
    async fn list_with_services(&self) -> Result<Vec<(provider::Model, Vec<service::Model>)>, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<provider::Model>, ServiceError>;
    async fn insert(&self, row: NewProvider) -> Result<provider::Model, ServiceError>;
    /// Write every column of an existing row.
    async fn save(&self, row: provider::Model) -> Result<provider::Model, ServiceError>;
    /// Remove the provider's services, then the provider, atomically.
    /// Returns the number of services removed.
    async fn delete_cascade(&self, id: i32) -> Result<u64, ServiceError>;
}

/// Persistence for services (offerings).
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list_with_provider(&self) -> Result<Vec<(service::Model, provider::Model)>, ServiceError>;
    async fn find_with_provider(&self, id: i32) -> Result<Option<(service::Model, provider::Model)>, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<service::Model>, ServiceError>;
    async fn insert(&self, row: NewService) -> Result<service::Model, ServiceError>;
    async fn save(&self, row: service::Model) -> Result<service::Model, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}
