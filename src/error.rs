use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::dtos::ErrorDto;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} with name '{name}' already exists.")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{kind} with id {id} not found.")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Station {0} is still used by a line.")]
    StationInUse(i64),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// `Json` extractor whose rejections render as `ErrorDto` like every other error.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DuplicateName { .. }
            | ApiError::InvalidRequest(_)
            | ApiError::StationInUse(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a unique-constraint violation on `name` to `DuplicateName`,
    /// everything else stays a database error.
    pub fn from_write(err: sqlx::Error, kind: &'static str, name: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        if is_unique {
            ApiError::DuplicateName {
                kind,
                name: name.to_string(),
            }
        } else {
            ApiError::Database(err)
        }
    }

    /// Maps a foreign-key violation on station removal to `StationInUse`.
    pub fn from_station_delete(err: sqlx::Error, id: i64) -> Self {
        let is_referenced = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_foreign_key_violation());

        if is_referenced {
            ApiError::StationInUse(id)
        } else {
            ApiError::Database(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                "Internal database error.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorDto { message })).into_response()
    }
}
