//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Response bodies follow
//! the wire contract of the service: a flat `{"error": "..."}` object
//! with a Spanish, client-facing message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum ApiError {
    // Account lookups
    /// Record lookup by id found nothing (role update).
    #[error("Usuario no encontrado")]
    UserNotFound,

    /// Recovery lookup by email found nothing.
    #[error("Correo no encontrado")]
    EmailNotFound,

    /// Login attempt against an email with no account. The login flow
    /// reports this as a client error, not as a missing resource.
    #[error("Usuario no encontrado")]
    UnknownAccount,

    // Credential checks
    #[error("Contraseña incorrecta")]
    InvalidPassword,

    #[error("Respuesta secreta incorrecta")]
    InvalidAnswer,

    /// Recovery ticket missing, malformed, expired, or minted for
    /// another email or purpose.
    #[error("Ticket de recuperación inválido")]
    InvalidTicket,

    /// Role value outside the closed role set.
    #[error("Rol no válido")]
    InvalidRole,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Error en el servidor")]
    Database(#[from] sea_orm::DbErr),

    #[error("Error en el servidor")]
    Token(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Error en el servidor")]
    Internal(String),

    /// Server-side failure already mapped to the fixed message of the
    /// operation where it surfaced.
    #[error("{0}")]
    Server(&'static str),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::EmailNotFound => StatusCode::NOT_FOUND,
            ApiError::UnknownAccount
            | ApiError::InvalidPassword
            | ApiError::InvalidAnswer
            | ApiError::InvalidTicket
            | ApiError::InvalidRole
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_)
            | ApiError::Token(_)
            | ApiError::Internal(_)
            | ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Error en el servidor".to_string()
            }
            ApiError::Token(e) => {
                tracing::error!("Token error: {:?}", e);
                "Error en el servidor".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Error en el servidor".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Collapse server-side failures into the fixed message each
    /// operation reports, logging the source before it is discarded.
    /// Client errors pass through untouched.
    pub fn at_boundary(self, public: &'static str) -> Self {
        match self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ApiError::Server(public)
            }
            ApiError::Token(e) => {
                tracing::error!("Token error: {:?}", e);
                ApiError::Server(public)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::Server(public)
            }
            ApiError::Server(_) => ApiError::Server(public),
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Convenience constructors
impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }
}
