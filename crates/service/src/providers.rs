use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use models::provider::{self, ProviderView};

use crate::cache::{ReadThroughCache, PROVIDERS_LIST, SERVICES_LIST};
use crate::domain::{CreateProvider, ProviderPatch};
use crate::errors::ServiceError;
use crate::notifier::{send_best_effort, Notification, Notifier};
use crate::repository::{NewProvider, ProviderRepository};

/// Provider use cases: validation, persistence, cache invalidation and mail.
///
/// Every successful mutation drops `providers_list`. `services_list` is dropped
/// as well since each listed service embeds its provider.
pub struct ProviderService {
    repo: Arc<dyn ProviderRepository>,
    cache: ReadThroughCache,
    notifier: Arc<dyn Notifier>,
}

impl ProviderService {
    pub fn new(repo: Arc<dyn ProviderRepository>, cache: ReadThroughCache, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, cache, notifier }
    }

    /// Serialized JSON array of every provider, read through `providers_list`.
    pub async fn list_all(&self) -> Result<String, ServiceError> {
        let repo = Arc::clone(&self.repo);
        let body = self
            .cache
            .get(PROVIDERS_LIST, || async move {
                let views: Vec<ProviderView> = repo
                    .list_with_services()
                    .await?
                    .into_iter()
                    .map(|(p, services)| ProviderView::new(p, services))
                    .collect();
                Ok(serde_json::to_string(&views)?)
            })
            .await?;
        info!("Retrieved all providers");
        Ok(body)
    }

    /// Single provider straight from the store; there is no per-id cache entry.
    pub async fn get(&self, id: i32) -> Result<Option<provider::Model>, ServiceError> {
        self.repo.find(id).await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: CreateProvider) -> Result<provider::Model, ServiceError> {
        if let Err(e) = provider::validate(&input.name, &input.email, &input.phone) {
            error!(errors = %e, "Validation errors occurred while creating provider");
            return Err(e.into());
        }

        let created = self
            .repo
            .insert(NewProvider { name: input.name, email: input.email, phone: input.phone, now: Utc::now().into() })
            .await?;

        self.invalidate().await;
        send_best_effort(self.notifier.as_ref(), Notification::provider_created(&created.email)).await;

        info!(provider_id = created.id, "Provider created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: ProviderPatch) -> Result<provider::Model, ServiceError> {
        let mut current = self.find_existing(id).await?;
        patch.apply(&mut current, Utc::now().into());

        if let Err(e) = provider::validate(&current.name, &current.email, &current.phone) {
            error!(provider_id = id, errors = %e, "Validation errors occurred while updating provider");
            return Err(e.into());
        }

        let saved = self.repo.save(current).await?;

        self.invalidate().await;
        send_best_effort(self.notifier.as_ref(), Notification::provider_updated(&saved.email)).await;

        info!(provider_id = saved.id, "Provider updated");
        Ok(saved)
    }

    /// Delete the provider together with its services. No notification is sent.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_existing(id).await?;
        let removed_services = self.repo.delete_cascade(id).await?;

        self.invalidate().await;

        info!(provider_id = id, removed_services, "Provider deleted");
        Ok(())
    }

    async fn find_existing(&self, id: i32) -> Result<provider::Model, ServiceError> {
        match self.repo.find(id).await? {
            Some(p) => Ok(p),
            None => {
                error!(provider_id = id, "Provider not found");
                Err(ServiceError::not_found("Provider"))
            }
        }
    }

    async fn invalidate(&self) {
        self.cache.delete(PROVIDERS_LIST).await;
        self.cache.delete(SERVICES_LIST).await;
    }
}
