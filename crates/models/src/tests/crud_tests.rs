use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use sea_orm::prelude::Decimal;
use uuid::Uuid;

use super::setup_test_db;
use crate::{provider, service};

fn new_provider(name: &str) -> provider::ActiveModel {
    let now = Utc::now().into();
    provider::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", Uuid::new_v4().simple())),
        phone: Set("555-0100".into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

fn new_service(provider_id: i32, name: &str) -> service::ActiveModel {
    let now = Utc::now().into();
    service::ActiveModel {
        name: Set(name.to_string()),
        description: Set("test offering".into()),
        price: Set(Decimal::from_str("19.99").unwrap()),
        provider_id: Set(provider_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_provider_crud() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let name = format!("crud_provider_{}", Uuid::new_v4());
    let created = new_provider(&name).insert(&db).await?;
    assert!(created.id > 0);

    let mut am: provider::ActiveModel = created.clone().into();
    am.phone = Set("555".into());
    let updated = am.update(&db).await?;
    assert_eq!(updated.phone, "555");
    assert_eq!(updated.name, name);

    provider::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(provider::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_service_price_and_relation() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let p = new_provider(&format!("rel_provider_{}", Uuid::new_v4())).insert(&db).await?;
    let s = new_service(p.id, "Cleaning").insert(&db).await?;
    assert_eq!(s.price.to_string(), "19.99");

    let (found, owner) = service::Entity::find_by_id(s.id)
        .find_also_related(provider::Entity)
        .one(&db)
        .await?
        .expect("service row");
    assert_eq!(found.provider_id, p.id);
    assert_eq!(owner.map(|o| o.id), Some(p.id));

    let listed = p.find_related(service::Entity).all(&db).await?;
    assert_eq!(listed.len(), 1);

    provider::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_fk_cascade_removes_services() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let p = new_provider(&format!("cascade_provider_{}", Uuid::new_v4())).insert(&db).await?;
    for i in 0..3 {
        new_service(p.id, &format!("svc {}", i)).insert(&db).await?;
    }

    provider::Entity::delete_by_id(p.id).exec(&db).await?;

    let left = service::Entity::find()
        .filter(service::Column::ProviderId.eq(p.id))
        .all(&db)
        .await?;
    assert!(left.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_service_requires_existing_provider() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let res = new_service(i32::MAX, "orphan").insert(&db).await;
    assert!(res.is_err(), "FK must reject dangling provider_id");
    Ok(())
}
