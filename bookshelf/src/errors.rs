use crate::db::errors::DbError;
use crate::types::Resource;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// A required identifier, body or header was absent or malformed
    #[error("{message}")]
    InvalidInput { resource: Resource, message: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_message: Option<String>,
}

impl Error {
    pub fn invalid_input(resource: Resource, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            resource,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            // Unknown ids are reported as a bad request, not 404
            Error::Database(DbError::NotFound { .. }) => StatusCode::BAD_REQUEST,
            Error::Database(DbError::UniqueViolation { .. }) => StatusCode::CONFLICT,
            Error::Database(db_err) if db_err.is_integrity_violation() => StatusCode::BAD_REQUEST,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput { resource, .. } => format!("{resource} details is wrong"),
            Error::Database(db_err) => match db_err {
                DbError::NotFound { message } => message.clone(),
                DbError::UniqueViolation { table, constraint, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("book"), Some("book_title_unique")) => "A book with this title already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { table, .. } => match table.as_deref() {
                    Some("book") => "Book owner does not exist".to_string(),
                    _ => "Invalid reference to related resource".to_string(),
                },
                DbError::NotNullViolation { column, .. } => match column.as_deref() {
                    Some(column) => format!("Missing required field: {column}"),
                    None => "Missing required field".to_string(),
                },
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Connectivity(_) | DbError::Other(_) => "Internal database error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }

    /// Detail for the caller; absent for not-found, which carries everything in `message`
    pub fn debug_message(&self) -> Option<String> {
        match self {
            Error::InvalidInput { message, .. } => Some(message.clone()),
            Error::Database(DbError::NotFound { .. }) => None,
            Error::Database(DbError::Other(err)) => Some(format!("{err:#}")),
            Error::Database(db_err) => Some(db_err.to_string()),
            Error::Other(err) => Some(format!("{err:#}")),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.user_message(),
            debug_message: self.debug_message(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::NotFound { .. }) => {
                tracing::info!("Not found: {}", self);
            }
            Error::Database(db_err) if db_err.is_integrity_violation() => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::InvalidInput { resource, .. } => {
                tracing::info!(%resource, "Invalid input: {}", self);
            }
            Error::Database(_) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
