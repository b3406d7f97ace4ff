use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Application error taxonomy. Every engine/store failure maps onto one of
/// these kinds; handlers return them as-is and the `ResponseError` impl picks
/// the status code.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    PreconditionFailed(String),

    #[display(fmt = "{}", _0)]
    InvalidState(String),

    #[display(fmt = "{}", _0)]
    ValidationFailed(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
