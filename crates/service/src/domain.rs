//! Request-side inputs for the provider and service operations.
//!
//! Patches carry `Option` fields: `None` (absent or `null`) leaves the stored
//! value unchanged.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use models::{provider, service};

/// Missing fields deserialize as empty strings so validation reports them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateProvider {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ProviderPatch {
    pub fn apply(self, target: &mut provider::Model, now: DateTime<FixedOffset>) {
        if let Some(name) = self.name { target.name = name; }
        if let Some(email) = self.email { target.email = email; }
        if let Some(phone) = self.phone { target.phone = phone; }
        target.updated_at = now;
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateService {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub provider_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub provider_id: Option<i32>,
}

impl ServicePatch {
    /// The caller checks that a new `provider_id` exists before applying.
    pub fn apply(self, target: &mut service::Model, now: DateTime<FixedOffset>) {
        if let Some(name) = self.name { target.name = name; }
        if let Some(description) = self.description { target.description = description; }
        if let Some(price) = self.price { target.price = service::normalize_price(price); }
        if let Some(provider_id) = self.provider_id { target.provider_id = provider_id; }
        target.updated_at = now;
    }
}
