use sea_orm::{
    ActiveModelTrait, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use models::{provider, service};

use crate::errors::ServiceError;
use crate::repository::{NewProvider, NewService, ProviderRepository, ServiceRepository};

/// Postgres-backed store for both resources.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn require_provider(row: (service::Model, Option<provider::Model>)) -> Result<(service::Model, provider::Model), ServiceError> {
    let (s, p) = row;
    match p {
        Some(p) => Ok((s, p)),
        None => Err(ServiceError::Db(format!("service {} references missing provider {}", s.id, s.provider_id))),
    }
}

#[async_trait::async_trait]
impl ProviderRepository for SeaOrmStore {
    async fn list_with_services(&self) -> Result<Vec<(provider::Model, Vec<service::Model>)>, ServiceError> {
        let rows = provider::Entity::find()
            .order_by_asc(provider::Column::Id)
            .find_with_related(service::Entity)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(p, mut services)| {
                services.sort_by_key(|s| s.id);
                (p, services)
            })
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<provider::Model>, ServiceError> {
        Ok(provider::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, row: NewProvider) -> Result<provider::Model, ServiceError> {
        let am = provider::ActiveModel {
            name: Set(row.name),
            email: Set(row.email),
            phone: Set(row.phone),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn save(&self, row: provider::Model) -> Result<provider::Model, ServiceError> {
        let am = provider::ActiveModel {
            id: Unchanged(row.id),
            name: Set(row.name),
            email: Set(row.email),
            phone: Set(row.phone),
            created_at: Unchanged(row.created_at),
            updated_at: Set(row.updated_at),
        };
        Ok(am.update(&self.db).await?)
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, ServiceError> {
        let txn = self.db.begin().await?;
        let removed = service::Entity::delete_many()
            .filter(service::Column::ProviderId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        provider::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl ServiceRepository for SeaOrmStore {
    async fn list_with_provider(&self) -> Result<Vec<(service::Model, provider::Model)>, ServiceError> {
        service::Entity::find()
            .order_by_asc(service::Column::Id)
            .find_also_related(provider::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(require_provider)
            .collect()
    }

    async fn find_with_provider(&self, id: i32) -> Result<Option<(service::Model, provider::Model)>, ServiceError> {
        service::Entity::find_by_id(id)
            .find_also_related(provider::Entity)
            .one(&self.db)
            .await?
            .map(require_provider)
            .transpose()
    }

    async fn find(&self, id: i32) -> Result<Option<service::Model>, ServiceError> {
        Ok(service::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, row: NewService) -> Result<service::Model, ServiceError> {
        let am = service::ActiveModel {
            name: Set(row.name),
            description: Set(row.description),
            price: Set(row.price),
            provider_id: Set(row.provider_id),
            created_at: Set(row.now),
            updated_at: Set(row.now),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn save(&self, row: service::Model) -> Result<service::Model, ServiceError> {
        let am = service::ActiveModel {
            id: Unchanged(row.id),
            name: Set(row.name),
            description: Set(row.description),
            price: Set(row.price),
            provider_id: Set(row.provider_id),
            created_at: Unchanged(row.created_at),
            updated_at: Set(row.updated_at),
        };
        Ok(am.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = service::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
