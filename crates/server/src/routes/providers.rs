use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use common::types::Message;
use service::domain::{CreateProvider, ProviderPatch};

use crate::errors::JsonApiError;
use crate::routes::{raw_json, Created};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/providers", tag = "providers",
    responses(
        (status = 200, description = "Every provider with its services", body = [crate::openapi::ProviderDoc]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    Ok(raw_json(state.providers.list_all().await?))
}

#[utoipa::path(
    post, path = "/api/providers", tag = "providers",
    request_body = crate::openapi::CreateProviderDoc,
    responses(
        (status = 201, description = "Provider created!"),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProvider>,
) -> Result<(StatusCode, Json<Created>), JsonApiError> {
    let created = state.providers.create(input).await?;
    Ok((StatusCode::CREATED, Json(Created { message: "Provider created!", id: created.id })))
}

#[utoipa::path(
    put, path = "/api/providers/{id}", tag = "providers",
    params(("id" = i32, Path, description = "Provider id")),
    request_body = crate::openapi::ProviderPatchDoc,
    responses(
        (status = 200, description = "Provider updated!"),
        (status = 400, description = "Validation errors"),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<ProviderPatch>,
) -> Result<Json<Message>, JsonApiError> {
    state.providers.update(id, patch).await?;
    Ok(Json(Message::new("Provider updated!")))
}

#[utoipa::path(
    delete, path = "/api/providers/{id}", tag = "providers",
    params(("id" = i32, Path, description = "Provider id")),
    responses(
        (status = 200, description = "Provider deleted!"),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Message>, JsonApiError> {
    state.providers.delete(id).await?;
    Ok(Json(Message::new("Provider deleted!")))
}
