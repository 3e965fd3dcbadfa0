use axum::{Json, http::StatusCode, response::IntoResponse};
use museion_schema::{EntityKind, UnknownEntityKind};
use serde::Serialize;
use serde_json::{Value, json};
use sqlx::error::ErrorKind;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MuseionError {
    /// Malformed or missing input, rejected before anything is written.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// A unique, foreign-key, not-null or check constraint rejected the write.
    #[error("Constraint violation ({constraint}): {message}")]
    Constraint {
        constraint: &'static str,
        message: String,
    },

    #[error("{kind} not found for id={id}")]
    NotFound { kind: EntityKind, id: i64 },

    #[error(transparent)]
    UnknownKind(#[from] UnknownEntityKind),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl MuseionError {
    /// True when the failure left the store untouched because a constraint refused the write.
    pub fn is_constraint(&self) -> bool {
        matches!(self, MuseionError::Constraint { .. })
    }
}

impl From<sqlx::Error> for MuseionError {
    fn from(e: sqlx::Error) -> Self {
        let constraint = match &e {
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => Some("unique"),
                ErrorKind::ForeignKeyViolation => Some("foreign_key"),
                ErrorKind::NotNullViolation => Some("not_null"),
                ErrorKind::CheckViolation => Some("check"),
                _ => None,
            },
            _ => None,
        };
        match constraint {
            Some(constraint) => MuseionError::Constraint {
                constraint,
                message: e.to_string(),
            },
            None => MuseionError::DatabaseError(e),
        }
    }
}

impl IntoResponse for MuseionError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            MuseionError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "INVALID_REQUEST".to_string(),
                    message,
                    details: None,
                },
            ),

            MuseionError::UnknownKind(UnknownEntityKind(kind)) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "UNKNOWN_KIND".to_string(),
                    message: format!("Unknown entity kind: {kind}"),
                    details: None,
                },
            ),

            MuseionError::Constraint {
                constraint,
                message,
            } => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "CONSTRAINT_VIOLATION".to_string(),
                    message: "The write was rejected by a store constraint.".to_string(),
                    details: Some(json!({ "constraint": constraint, "reason": message })),
                },
            ),

            MuseionError::NotFound { kind, id } => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: format!("No {kind} with id {id}."),
                    details: None,
                },
            ),

            MuseionError::DatabaseError(_)
            | MuseionError::RactorError(_)
            | MuseionError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
