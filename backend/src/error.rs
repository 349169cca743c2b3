use rocket::http::Status;
use rocket::response::Responder;
use serde::Serialize;
use shared::{ErrorCode, ValidationError};
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid {0} id")]
    InvalidId(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::InvalidId(_) => Status::BadRequest,
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        match err.code {
            ErrorCode::NotFound | ErrorCode::NoHistory | ErrorCode::HistoryNotFound => {
                ApiError::NotFound(err.message)
            }
            ErrorCode::AlreadyExists | ErrorCode::DuplicatePoll => ApiError::Conflict(err.message),
            ErrorCode::Backend => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();

        rocket::Response::build_from(self.to_string().respond_to(req)?)
            .status(status)
            .ok()
    }
}
