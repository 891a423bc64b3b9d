//! Error taxonomy shared by the store, the services and the HTTP layer.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A referenced parent, category or product is missing or inactive.
    #[error("{0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ShopResult<T> = Result<T, ShopError>;

impl ShopError {
    pub fn precondition(message: impl Into<String>) -> Self {
        ShopError::PreconditionFailed(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ShopError::Forbidden(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ShopError::Unauthorized(message.into())
    }
}

impl ResponseError for ShopError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShopError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShopError::PreconditionFailed(_)
            | ShopError::AlreadyExists(_)
            | ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::Unauthorized(_) | ShopError::Token(_) => StatusCode::UNAUTHORIZED,
            ShopError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShopError::Database(_)
            | ShopError::Pool(_)
            | ShopError::Migration(_)
            | ShopError::Hash(_)
            | ShopError::Config(_)
            | ShopError::Blocking(_)
            | ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            error!("request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "detail": detail }))
    }
}
