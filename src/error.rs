//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unknown table")]
    UnknownTable(String),
    #[error("record not found")]
    RecordNotFound,
    #[error("field {0} have invalid type")]
    InvalidField(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownTable(_) | AppError::RecordNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidField(_) => StatusCode::BAD_REQUEST,
            AppError::Parse(_) | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
