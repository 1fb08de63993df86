use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldViolation, ModelError};
use crate::service;

pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PHONE_MAX_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Services }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Services => Entity::has_many(service::Entity).into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Services.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Option<FieldViolation> {
    if name.trim().is_empty() {
        return Some(FieldViolation::new("name", "This value should not be blank."));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Some(FieldViolation::new("name", format!("This value is too long. It should have {} characters or less.", NAME_MAX_LEN)));
    }
    None
}

/// Loose address check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else { return false };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !domain.starts_with('.'),
        None => false,
    }
}

pub fn validate_email(email: &str) -> Option<FieldViolation> {
    if email.trim().is_empty() {
        return Some(FieldViolation::new("email", "This value should not be blank."));
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Some(FieldViolation::new("email", format!("This value is too long. It should have {} characters or less.", EMAIL_MAX_LEN)));
    }
    if !is_valid_email(email) {
        return Some(FieldViolation::new("email", "This value is not a valid email address."));
    }
    None
}

pub fn validate_phone(phone: &str) -> Option<FieldViolation> {
    if phone.trim().is_empty() {
        return Some(FieldViolation::new("phone", "This value should not be blank."));
    }
    if phone.chars().count() > PHONE_MAX_LEN {
        return Some(FieldViolation::new("phone", format!("This value is too long. It should have {} characters or less.", PHONE_MAX_LEN)));
    }
    None
}

/// Validate every field and report all violations at once.
pub fn validate(name: &str, email: &str, phone: &str) -> Result<(), ModelError> {
    let violations: Vec<FieldViolation> = [validate_name(name), validate_email(email), validate_phone(phone)]
        .into_iter()
        .flatten()
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Invalid(violations))
    }
}

/// Serialized shape of a provider: `{id,name,email,phone,createdAt,updatedAt,services}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub services: Vec<service::ServiceSummary>,
}

impl ProviderView {
    pub fn new(provider: Model, services: Vec<service::Model>) -> Self {
        Self {
            id: provider.id,
            name: provider.name,
            email: provider.email,
            phone: provider.phone,
            created_at: provider.created_at,
            updated_at: provider.updated_at,
            services: services.into_iter().map(service::ServiceSummary::from).collect(),
        }
    }
}

/// Provider as embedded in a service; omits the services back-reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<Model> for ProviderSummary {
    fn from(m: Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email, phone: m.phone }
    }
}
