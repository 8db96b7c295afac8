use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Structured validation failure for a single field
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

#[derive(Debug)]
pub enum AppError {
    // Database errors
    Database(sqlx::Error),
    DatabaseError(String), // String-based database error

    // Request validation errors
    ValidateRequest(String),
    ValidateRequestList(Vec<FieldError>), // With per-field detail

    // Authentication errors (uniform wording, no enumeration oracle)
    InvalidCredentials,
    InvalidCode,
    InvalidToken,
    InvalidClient,
    InvalidUser(String),
    InvalidSession,
    DenyConsent,

    // Authorization errors
    Forbidden(String),

    // Business logic errors
    NotFoundRecord(String),
    Conflict(String),

    // Startup / crypto errors
    InvalidRsa(String),

    // Internal errors
    InternalError(String),
    ConfigError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ValidateRequest(msg) => write!(f, "Validation error: {}", msg),
            AppError::ValidateRequestList(errors) => {
                write!(f, "Validation error: {} invalid field(s)", errors.len())
            },
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::InvalidCode => write!(f, "Invalid authorization code"),
            AppError::InvalidToken => write!(f, "Invalid token"),
            AppError::InvalidClient => write!(f, "Invalid client"),
            AppError::InvalidUser(msg) => write!(f, "Invalid user: {}", msg),
            AppError::InvalidSession => write!(f, "Invalid or expired session"),
            AppError::DenyConsent => write!(f, "Consent denied"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFoundRecord(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidRsa(msg) => write!(f, "RSA key error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidateRequest(_) | AppError::ValidateRequestList(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::InvalidCredentials
            | AppError::InvalidCode
            | AppError::InvalidToken
            | AppError::InvalidClient
            | AppError::InvalidUser(_)
            | AppError::InvalidSession
            | AppError::DenyConsent => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFoundRecord(_) => StatusCode::NOT_FOUND,
            // Uniqueness conflicts surface as 422 on this API
            AppError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidRsa(_) | AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Stable error code for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidateRequest(_) | AppError::ValidateRequestList(_) => "VALIDATE_REQUEST",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidCode => "INVALID_CODE",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InvalidClient => "INVALID_CLIENT",
            AppError::InvalidUser(_) => "INVALID_USER",
            AppError::InvalidSession => "INVALID_SESSION",
            AppError::DenyConsent => "DENY_CONSENT",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFoundRecord(_) => "NOT_FOUND_RECORD",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidRsa(_) => "INVALID_RSA",
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Build a ValidateRequestList from validator's derive output
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let list = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    msg: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        AppError::ValidateRequestList(list)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // 5xx details are logged, never sent to clients
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            },
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "Database error".to_string()
            },
            AppError::InvalidRsa(msg) => {
                tracing::error!("RSA key error: {}", msg);
                "Signing key unavailable".to_string()
            },
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            },
            AppError::ConfigError(msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            },
            other => other.to_string(),
        };

        let error_list = match &self {
            AppError::ValidateRequestList(errors) => Some(errors.clone()),
            _ => None,
        };

        let body = match error_list {
            Some(list) => Json(json!({
                "error": code,
                "message": message,
                "statusCode": status.as_u16(),
                "errorList": list,
            })),
            None => Json(json!({
                "error": code,
                "message": message,
                "statusCode": status.as_u16(),
            })),
        };

        (status, body).into_response()
    }
}

// From implementations for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AppError::NotFoundRecord("Record not found".to_string());
        }
        if let sqlx::Error::Database(ref db) = err {
            match db.code().as_deref() {
                // Unique constraint violation
                Some("23505") => {
                    return AppError::Conflict("Resource already exists".to_string());
                },
                // Foreign key violation
                Some("23503") => {
                    return AppError::ValidateRequest(
                        "Referenced record does not exist".to_string(),
                    );
                },
                _ => {},
            }
        }
        AppError::Database(err)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::from_validation(err)
    }
}
