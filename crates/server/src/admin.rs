//! Maintenance routes served on the admin listener, never on the public API.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info};

use common::types::Message;
use service::cache::ReadThroughCache;

use crate::errors::JsonApiError;

pub const CACHE_CLEARED: &str = "Cache cleared successfully.";

pub fn admin_routes(cache: ReadThroughCache) -> Router {
    Router::new().route("/cache/clear", post(clear_cache)).with_state(cache)
}

/// Drop every cache entry, whatever its key.
pub async fn clear_cache(State(cache): State<ReadThroughCache>) -> Result<Json<Message>, JsonApiError> {
    if let Err(e) = cache.clear().await {
        error!(error = %e, "cache clear failed");
        return Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Cache Clear Failed", Some(e.to_string())));
    }
    info!("cache cleared via admin endpoint");
    Ok(Json(Message::new(CACHE_CLEARED)))
}
