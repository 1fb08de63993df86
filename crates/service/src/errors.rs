use thiserror::Error;

use models::errors::{join_violations, FieldViolation, ModelError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ServiceError {
    /// `NotFound` with the message returned to clients, e.g. `Provider not found`.
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Invalid(v) => ServiceError::Validation(v),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self { ServiceError::Serialization(e.to_string()) }
}
