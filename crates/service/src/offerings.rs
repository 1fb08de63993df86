use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use models::service::{self, ServiceView};

use crate::cache::{service_key, ReadThroughCache, PROVIDERS_LIST, SERVICES_LIST};
use crate::domain::{CreateService, ServicePatch};
use crate::errors::ServiceError;
use crate::notifier::{send_best_effort, Notification, Notifier};
use crate::repository::{NewService, ProviderRepository, ServiceRepository};

/// Service (offering) use cases.
///
/// Mutations drop the list keys only. A cached `service_<id>` detail entry is
/// left in place and may serve the pre-mutation body until its TTL runs out.
pub struct OfferingService {
    repo: Arc<dyn ServiceRepository>,
    providers: Arc<dyn ProviderRepository>,
    cache: ReadThroughCache,
    notifier: Arc<dyn Notifier>,
    admin_recipient: String,
}

impl OfferingService {
    pub fn new(
        repo: Arc<dyn ServiceRepository>,
        providers: Arc<dyn ProviderRepository>,
        cache: ReadThroughCache,
        notifier: Arc<dyn Notifier>,
        admin_recipient: impl Into<String>,
    ) -> Self {
        Self { repo, providers, cache, notifier, admin_recipient: admin_recipient.into() }
    }

    /// Serialized JSON array of every service, read through `services_list`.
    pub async fn list_all(&self) -> Result<String, ServiceError> {
        let repo = Arc::clone(&self.repo);
        let body = self
            .cache
            .get(SERVICES_LIST, || async move {
                let views: Vec<ServiceView> = repo
                    .list_with_provider()
                    .await?
                    .into_iter()
                    .map(|(s, p)| ServiceView::new(s, p))
                    .collect();
                Ok(serde_json::to_string(&views)?)
            })
            .await?;
        info!("Retrieved all services");
        Ok(body)
    }

    /// Serialized JSON object for one service, read through `service_<id>`.
    /// A missing row fails the producer, so "not found" is never cached.
    pub async fn get_one(&self, id: i32) -> Result<String, ServiceError> {
        let repo = Arc::clone(&self.repo);
        let body = self
            .cache
            .get(&service_key(id), || async move {
                match repo.find_with_provider(id).await? {
                    Some((s, p)) => Ok(serde_json::to_string(&ServiceView::new(s, p))?),
                    None => Err(ServiceError::not_found("Service")),
                }
            })
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::NotFound(_)) {
                    error!(service_id = id, "Service not found");
                }
            })?;
        info!(service_id = id, "Retrieved service");
        Ok(body)
    }

    /// Only the provider reference is checked; name and price are stored as given.
    #[instrument(skip(self, input), fields(provider_id = input.provider_id))]
    pub async fn create(&self, input: CreateService) -> Result<service::Model, ServiceError> {
        self.require_provider(input.provider_id).await?;

        let created = self
            .repo
            .insert(NewService {
                name: input.name,
                description: input.description,
                price: service::normalize_price(input.price),
                provider_id: input.provider_id,
                now: Utc::now().into(),
            })
            .await?;

        self.invalidate_lists().await;
        send_best_effort(self.notifier.as_ref(), Notification::service_created(&self.admin_recipient)).await;

        info!(service_id = created.id, "Service created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: ServicePatch) -> Result<service::Model, ServiceError> {
        let mut current = match self.repo.find(id).await? {
            Some(s) => s,
            None => {
                error!(service_id = id, "Service not found");
                return Err(ServiceError::not_found("Service"));
            }
        };
        if let Some(provider_id) = patch.provider_id {
            self.require_provider(provider_id).await?;
        }

        patch.apply(&mut current, Utc::now().into());
        let saved = self.repo.save(current).await?;

        self.invalidate_lists().await;
        send_best_effort(self.notifier.as_ref(), Notification::service_updated(&self.admin_recipient)).await;

        info!(service_id = saved.id, "Service updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            error!(service_id = id, "Service not found");
            return Err(ServiceError::not_found("Service"));
        }

        self.invalidate_lists().await;

        info!(service_id = id, "Service deleted");
        Ok(())
    }

    async fn require_provider(&self, provider_id: i32) -> Result<(), ServiceError> {
        if self.providers.find(provider_id).await?.is_none() {
            error!(provider_id, "Provider not found");
            return Err(ServiceError::not_found("Provider"));
        }
        Ok(())
    }

    // providers_list embeds each provider's services
    async fn invalidate_lists(&self) {
        self.cache.delete(SERVICES_LIST).await;
        self.cache.delete(PROVIDERS_LIST).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use rust_decimal::Decimal;
    use crate::domain::CreateProvider;
    use crate::test_support::Fixture;

    async fn provider(fx: &Fixture, name: &str) -> i32 {
        fx.providers
            .create(CreateProvider { name: name.into(), email: "p@example.com".into(), phone: "555".into() })
            .await
            .unwrap()
            .id
    }

    fn listed(body: &str) -> Vec<serde_json::Value> {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn create_requires_existing_provider() {
        let fx = Fixture::new();
        let err = fx.create_service(77, "Ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Provider not found");
        assert!(listed(&fx.offerings.list_all().await.unwrap()).is_empty());
        assert!(fx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn create_notifies_fixed_recipient_and_refreshes_list() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;
        assert!(listed(&fx.offerings.list_all().await?).is_empty());

        let s = fx.create_service(pid, "Cleaning").await?;
        let list = listed(&fx.offerings.list_all().await?);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], s.id);
        assert_eq!(list[0]["price"], "19.99");
        assert_eq!(list[0]["provider"]["id"], pid);

        let last = fx.notifier.sent().pop().unwrap();
        assert_eq!(last.to, "admin@example.com");
        assert_eq!(last.subject, "Service Created");
        Ok(())
    }

    #[tokio::test]
    async fn provider_listing_sees_new_service() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;
        fx.providers.list_all().await?;
        fx.create_service(pid, "Cleaning").await?;
        let providers = listed(&fx.providers.list_all().await?);
        assert_eq!(providers[0]["services"][0]["name"], "Cleaning");
        Ok(())
    }

    #[tokio::test]
    async fn get_one_missing_is_never_cached() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;

        for _ in 0..2 {
            let err = fx.offerings.get_one(1).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)));
        }
        assert_eq!(fx.service_detail_loads(), 2);

        // the next id the store hands out is 1
        fx.create_service(pid, "Cleaning").await?;
        let body: serde_json::Value = serde_json::from_str(&fx.offerings.get_one(1).await?).unwrap();
        assert_eq!(body["name"], "Cleaning");
        Ok(())
    }

    #[tokio::test]
    async fn detail_entry_survives_update_until_expiry() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;
        let s = fx.create_service(pid, "Cleaning").await?;

        let before: serde_json::Value = serde_json::from_str(&fx.offerings.get_one(s.id).await?).unwrap();
        assert_eq!(before["name"], "Cleaning");

        fx.offerings.update(s.id, ServicePatch { name: Some("Deep cleaning".into()), ..Default::default() }).await?;

        // list is fresh, the per-id entry is not
        assert_eq!(listed(&fx.offerings.list_all().await?)[0]["name"], "Deep cleaning");
        let cached: serde_json::Value = serde_json::from_str(&fx.offerings.get_one(s.id).await?).unwrap();
        assert_eq!(cached["name"], "Cleaning");

        fx.cache.clear().await.unwrap();
        let fresh: serde_json::Value = serde_json::from_str(&fx.offerings.get_one(s.id).await?).unwrap();
        assert_eq!(fresh["name"], "Deep cleaning");
        Ok(())
    }

    #[tokio::test]
    async fn update_moves_service_to_another_provider() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let a = provider(&fx, "A").await;
        let b = provider(&fx, "B").await;
        let s = fx.create_service(a, "Cleaning").await?;

        let err = fx
            .offerings
            .update(s.id, ServicePatch { provider_id: Some(999), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider not found");

        let moved = fx
            .offerings
            .update(s.id, ServicePatch { provider_id: Some(b), price: Some(Decimal::from_str("5").unwrap()), ..Default::default() })
            .await?;
        assert_eq!(moved.provider_id, b);
        assert_eq!(moved.name, "Cleaning");
        assert_eq!(moved.price, Decimal::from_str("5").unwrap());
        assert!(moved.updated_at >= s.updated_at);

        let last = fx.notifier.sent().pop().unwrap();
        assert_eq!(last.subject, "Service Updated");
        assert_eq!(last.to, "admin@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_missing_service() {
        let fx = Fixture::new();
        let err = fx.offerings.update(5, ServicePatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Service not found");
        let err = fx.offerings.delete(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Service not found");
    }

    #[tokio::test]
    async fn delete_refreshes_list_without_notification() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;
        let s = fx.create_service(pid, "Cleaning").await?;
        assert_eq!(listed(&fx.offerings.list_all().await?).len(), 1);
        let sent_before = fx.notifier.sent().len();

        fx.offerings.delete(s.id).await?;
        assert!(listed(&fx.offerings.list_all().await?).is_empty());
        assert_eq!(fx.notifier.sent().len(), sent_before);
        Ok(())
    }

    #[tokio::test]
    async fn negative_price_is_stored_as_given() -> Result<(), ServiceError> {
        let fx = Fixture::new();
        let pid = provider(&fx, "Acme").await;
        let s = fx
            .offerings
            .create(CreateService { name: String::new(), description: String::new(), price: Decimal::from_str("-1.234").unwrap(), provider_id: pid })
            .await?;
        assert_eq!(s.price.to_string(), "-1.23");
        Ok(())
    }
}
