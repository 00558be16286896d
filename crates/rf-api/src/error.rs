//! Maps `rf-core` errors onto HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use rf_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] AppError);

/// Port methods return `anyhow::Result`; anything that bubbles up from
/// them is an infrastructure failure.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(AppError::Internal(err.to_string()))
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError(AppError::Internal(format!("template rendering failed: {err}")))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self.0);
        }
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
