//! In-process store with the same foreign-key and cascade rules as the
//! Postgres schema. Selected with `database.url = "memory://"`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use models::{provider, service};

use crate::errors::ServiceError;
use crate::repository::{NewProvider, NewService, ProviderRepository, ServiceRepository};

#[derive(Default)]
struct Tables {
    providers: BTreeMap<i32, provider::Model>,
    services: BTreeMap<i32, service::Model>,
    last_provider_id: i32,
    last_service_id: i32,
}

impl Tables {
    fn provider_of(&self, s: &service::Model) -> Result<provider::Model, ServiceError> {
        self.providers
            .get(&s.provider_id)
            .cloned()
            .ok_or_else(|| ServiceError::Db(format!("service {} references missing provider {}", s.id, s.provider_id)))
    }

    fn check_fk(&self, provider_id: i32) -> Result<(), ServiceError> {
        if self.providers.contains_key(&provider_id) {
            Ok(())
        } else {
            Err(ServiceError::Db(format!("foreign key violation: provider {} does not exist", provider_id)))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
        self.tables.lock().map_err(|_| ServiceError::Db("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl ProviderRepository for MemoryStore {
    async fn list_with_services(&self) -> Result<Vec<(provider::Model, Vec<service::Model>)>, ServiceError> {
        let t = self.lock()?;
        Ok(t.providers
            .values()
            .map(|p| {
                let owned = t.services.values().filter(|s| s.provider_id == p.id).cloned().collect();
                (p.clone(), owned)
            })
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<provider::Model>, ServiceError> {
        Ok(self.lock()?.providers.get(&id).cloned())
    }

    async fn insert(&self, row: NewProvider) -> Result<provider::Model, ServiceError> {
        let mut t = self.lock()?;
        t.last_provider_id += 1;
        let model = provider::Model {
            id: t.last_provider_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.now,
            updated_at: row.now,
        };
        t.providers.insert(model.id, model.clone());
        Ok(model)
    }

    async fn save(&self, row: provider::Model) -> Result<provider::Model, ServiceError> {
        let mut t = self.lock()?;
        match t.providers.get_mut(&row.id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(ServiceError::Db(format!("provider {} does not exist", row.id))),
        }
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, ServiceError> {
        let mut t = self.lock()?;
        let before = t.services.len();
        t.services.retain(|_, s| s.provider_id != id);
        let removed = (before - t.services.len()) as u64;
        t.providers.remove(&id);
        Ok(removed)
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn list_with_provider(&self) -> Result<Vec<(service::Model, provider::Model)>, ServiceError> {
        let t = self.lock()?;
        t.services
            .values()
            .map(|s| Ok((s.clone(), t.provider_of(s)?)))
            .collect()
    }

    async fn find_with_provider(&self, id: i32) -> Result<Option<(service::Model, provider::Model)>, ServiceError> {
        let t = self.lock()?;
        match t.services.get(&id) {
            Some(s) => Ok(Some((s.clone(), t.provider_of(s)?))),
            None => Ok(None),
        }
    }

    async fn find(&self, id: i32) -> Result<Option<service::Model>, ServiceError> {
        Ok(self.lock()?.services.get(&id).cloned())
    }

    async fn insert(&self, row: NewService) -> Result<service::Model, ServiceError> {
        let mut t = self.lock()?;
        t.check_fk(row.provider_id)?;
        t.last_service_id += 1;
        let model = service::Model {
            id: t.last_service_id,
            name: row.name,
            description: row.description,
            price: service::normalize_price(row.price),
            provider_id: row.provider_id,
            created_at: row.now,
            updated_at: row.now,
        };
        t.services.insert(model.id, model.clone());
        Ok(model)
    }

    async fn save(&self, row: service::Model) -> Result<service::Model, ServiceError> {
        let mut t = self.lock()?;
        t.check_fk(row.provider_id)?;
        let row = service::Model { price: service::normalize_price(row.price), ..row };
        match t.services.get_mut(&row.id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(ServiceError::Db(format!("service {} does not exist", row.id))),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.lock()?.services.remove(&id).is_some())
    }
}
