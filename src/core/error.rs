use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

/// Machine-readable marker returned when a student has no profile yet
pub const PROFILE_REQUIRED_CODE: &str = "profile_required";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller must finish setting up a related record (e.g. a student profile) first
    #[error("Profile required: {0}")]
    ProfileRequired(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Field messages inside a `Validation` error are separated by this marker
const VALIDATION_SEPARATOR: &str = "; ";

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match (&e.message, field.as_ref()) {
                    // struct-level checks are reported under `__all__`
                    (Some(msg), "__all__") => msg.to_string(),
                    (Some(msg), _) => format!("{}: {}", field, msg),
                    (None, _) => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(VALIDATION_SEPARATOR))
    }
}

impl AppError {
    /// Map database errors to conflict/bad-request when a constraint explains them
    pub fn from_db(e: sqlx::Error, conflict_message: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            // Unique constraint violation
            if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
                return AppError::Conflict(conflict_message.to_string());
            }

            // Foreign key violation
            if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
                return AppError::BadRequest("Referenced record does not exist.".to_string());
            }
        }

        tracing::error!("Database error: {:?}", e);
        AppError::Database(e)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ProfileRequired(_) => StatusCode::PRECONDITION_REQUIRED,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error occurred".to_string(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                ("File storage is unavailable".to_string(), None)
            }
            AppError::Validation(ref msg) => (
                "Validation failed".to_string(),
                Some(msg.split(VALIDATION_SEPARATOR).map(str::to_string).collect()),
            ),
            AppError::ProfileRequired(ref msg) => {
                (msg.clone(), Some(vec![PROFILE_REQUIRED_CODE.to_string()]))
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Auth(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => (msg, None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ProfileRequired("x".into()).status_code(),
            StatusCode::PRECONDITION_REQUIRED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_errors_list_field_messages() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("length");
        err.message = Some("Title is required".into());
        errors.add("title", err);

        match AppError::from(errors) {
            AppError::Validation(msg) => assert_eq!(msg, "title: Title is required"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_struct_level_validation_message_has_no_field_prefix() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("date_range");
        err.message = Some("Start date cannot be after end date".into());
        errors.add("__all__", err);

        match AppError::from(errors) {
            AppError::Validation(msg) => assert_eq!(msg, "Start date cannot be after end date"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_database_error_passes_through_from_db() {
        let err = AppError::from_db(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(err, AppError::Database(sqlx::Error::RowNotFound)));
    }
}
