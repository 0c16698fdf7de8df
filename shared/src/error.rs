use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::env::{which, Environment};

/// Why a credential was rejected. Only ever logged; clients get a uniform message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AuthFailure {
    MissingCredential,
    TokenExpired,
    TokenRevoked,
    TokenInvalid,
}

/// Coarse failure categories seen by callers of the core components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    Validation,
    NotFound,
    Conflict,
    ServerError,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    UnauthenticatedError(AuthFailure),
    #[error("{0}")]
    ForbiddenOperation(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    MalformedBody(#[from] JsonRejection),
    #[error("{0}")]
    MalformedQuery(#[from] QueryRejection),
    #[error("{0}")]
    ImmutableField(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    MalformedId(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Transaction could not be executed")]
    TransactionError(#[source] sqlx::Error),
    #[error("An error occurred while running a database operation")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::UnauthenticatedError(_) => ErrorKind::Unauthenticated,
            AppError::ForbiddenOperation(_) => ErrorKind::Forbidden,
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::MalformedBody(_)
            | AppError::MalformedQuery(_)
            | AppError::ImmutableField(_) => ErrorKind::Validation,
            AppError::EntityNotFound(_) | AppError::MalformedId(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ExternalServiceError(_)
            | AppError::ConversionEntityError(_) => ErrorKind::ServerError,
        }
    }

    /// Maps a store error to `Conflict` when it is a uniqueness violation.
    pub fn from_write(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(conflict_message.into())
            }
            _ => AppError::SpecificOperationError(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::UnauthenticatedError(reason) => {
                tracing::warn!(%reason, "Rejected credential");
                json!({ "message": self.to_string() })
            }
            e if e.kind() == ErrorKind::ServerError => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                match which() {
                    Environment::Development => json!({
                        "message": "Server error",
                        "error": format!("{e:?}"),
                    }),
                    Environment::Production => json!({ "message": "Server error" }),
                }
            }
            e => json!({ "message": e.to_string() }),
        };

        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
