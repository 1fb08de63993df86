//! Service layer for providers and their services.
//! - Orchestrates validation, persistence, cache invalidation and notification.
//! - Persistence, cache and mail are injected behind traits.
//! - Reuses validation and entity definitions in `models` crate.

pub mod errors;
pub mod cache;
pub mod notifier;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod providers;
pub mod offerings;
#[cfg(test)]
pub mod test_support;

pub use offerings::OfferingService;
pub use providers::ProviderService;
