use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Please use application/json content type!")]
    InvalidContentType,
    #[error("Please provide a valid JSON object!")]
    InvalidJson,
    #[error("Please provide the title of the post!")]
    MissingTitle,
    #[error("Please provide the body of the post!")]
    MissingBody,
    #[error("The {0} of the post must be a string, number or boolean!")]
    InvalidField(&'static str),
    #[error("The request body is larger than {0} bytes!")]
    PayloadTooLarge(usize),
    #[error("Please provide the pk of the post to delete...")]
    MissingId,
    #[error("There is no blog post with id: {0} in the DB.")]
    PostNotFound(String),
    /// The cause is kept for logs only; clients get the generic message.
    #[error("The blog storage is unavailable, please try again later.")]
    StorageUnavailable(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StorageUnavailable(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::InvalidContentType
            | DomainError::InvalidJson
            | DomainError::MissingTitle
            | DomainError::MissingBody
            | DomainError::InvalidField(_)
            | DomainError::MissingId => StatusCode::BAD_REQUEST,
            DomainError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: message.as_str(),
        })
    }
}
