use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use common::types::Message;
use service::domain::{CreateService, ServicePatch};

use crate::errors::JsonApiError;
use crate::routes::{raw_json, Created};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/services", tag = "services",
    responses(
        (status = 200, description = "Every service with its provider", body = [crate::openapi::ServiceDoc]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    Ok(raw_json(state.offerings.list_all().await?))
}

#[utoipa::path(
    get, path = "/api/services/{id}", tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service with its provider", body = crate::openapi::ServiceDoc),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response, JsonApiError> {
    Ok(raw_json(state.offerings.get_one(id).await?))
}

#[utoipa::path(
    post, path = "/api/services", tag = "services",
    request_body = crate::openapi::CreateServiceDoc,
    responses(
        (status = 201, description = "Service created!"),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateService>,
) -> Result<(StatusCode, Json<Created>), JsonApiError> {
    let created = state.offerings.create(input).await?;
    Ok((StatusCode::CREATED, Json(Created { message: "Service created!", id: created.id })))
}

#[utoipa::path(
    put, path = "/api/services/{id}", tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    request_body = crate::openapi::ServicePatchDoc,
    responses(
        (status = 200, description = "Service updated!"),
        (status = 404, description = "Service or provider not found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<Message>, JsonApiError> {
    state.offerings.update(id, patch).await?;
    Ok(Json(Message::new("Service updated!")))
}

#[utoipa::path(
    delete, path = "/api/services/{id}", tag = "services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Message>, JsonApiError> {
    state.offerings.delete(id).await?;
    Ok(Json(Message::new("Service deleted")))
}
