// src/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::repositories::post_repository::StoreError;
use crate::services::upload_service::UploadError;

/// Request-level failures. Rejected submissions never reach this type;
/// the router turns them into a redirect before anything is stored.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("field {0} is not valid UTF-8")]
    InvalidText(String),
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for BoardError {
    fn status_code(&self) -> StatusCode {
        match self {
            BoardError::Multipart(_) | BoardError::InvalidText(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("request failed: {}", self);
        let message = match self.status_code() {
            StatusCode::BAD_REQUEST => "Bad Request",
            _ => "Internal Server Error",
        };
        HttpResponse::build(self.status_code())
            .content_type(mime::TEXT_PLAIN_UTF_8)
            .body(message)
    }
}
