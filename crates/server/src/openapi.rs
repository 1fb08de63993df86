use rust_decimal::Decimal;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CreateProviderDoc { pub name: String, pub email: String, pub phone: String }

#[derive(ToSchema)]
pub struct ProviderPatchDoc { pub name: Option<String>, pub email: Option<String>, pub phone: Option<String> }

#[derive(ToSchema)]
pub struct CreateServiceDoc {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub provider_id: i32,
}

#[derive(ToSchema)]
pub struct ServicePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub provider_id: Option<i32>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceSummaryDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ProviderSummaryDoc { pub id: i32, pub name: String, pub email: String, pub phone: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProviderDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
    pub updated_at: String,
    pub services: Vec<ServiceSummaryDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub provider: ProviderSummaryDoc,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::providers::list,
        crate::routes::providers::create,
        crate::routes::providers::update,
        crate::routes::providers::delete,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreateProviderDoc,
            ProviderPatchDoc,
            CreateServiceDoc,
            ServicePatchDoc,
            ServiceSummaryDoc,
            ProviderSummaryDoc,
            ProviderDoc,
            ServiceDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "providers"),
        (name = "services")
    )
)]
pub struct ApiDoc;
