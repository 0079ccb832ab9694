use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bitslow_core::ExchangeError;
use bitslow_db::DatabaseError;
use thiserror::Error;
use tracing::{error, warn};

use crate::types::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Not Found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Exchange(ExchangeError::CoinNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Exchange(ExchangeError::CombinationsExhausted { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Exchange(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic detail for 5xx responses: the debug form plus any sources
    pub fn details(&self) -> Option<String> {
        if !self.status().is_server_error() {
            return None;
        }
        let mut details = format!("{:?}", self);
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            details.push_str(&format!("; caused by: {}", err));
            source = err.source();
        }
        Some(details)
    }

    /// Short label used for the error metric
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Exchange(ExchangeError::CoinNotFound(_)) | ApiError::NotFound => "not_found",
            ApiError::Exchange(ExchangeError::CombinationsExhausted { .. }) => "exhausted",
            ApiError::Exchange(_) => "validation",
            ApiError::Database(_) => "database",
            ApiError::Server(_) => "server",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        bitslow_metrics::counters::api_errors(1, self.kind());

        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
