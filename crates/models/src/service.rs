//! `service` entity: an offering owned by exactly one provider.
use rust_decimal::RoundingStrategy;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::provider;

/// Scale of the `price` column (`numeric(10,2)`).
pub const PRICE_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub provider_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .on_delete(sea_orm::sea_query::ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Round half away from zero to the stored precision and pad to two places,
/// matching what `numeric(10,2)` hands back.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut p = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    p.rescale(PRICE_SCALE);
    p
}

/// Serialized shape of a service: `{id,name,description,price,provider,createdAt,updatedAt}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub provider: provider::ProviderSummary,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl ServiceView {
    pub fn new(service: Model, provider: provider::Model) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            price: service.price,
            provider: provider.into(),
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

/// Service as listed under its provider; omits the provider back-reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<Model> for ServiceSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
