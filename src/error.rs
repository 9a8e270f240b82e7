use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::structs::api::{ErrorBody, NotFoundBody};

/// Everything that can go wrong while validating or persisting a person.
#[derive(Debug, thiserror::Error)]
pub enum PersonError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    #[error("`{field}` must have at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("`{0}` must be a non-empty string")]
    InvalidFieldValue(&'static str),

    #[error("`nascimento` must follow the YYYY-MM-DD format")]
    InvalidDateFormat,

    #[error("`stack` must be an array of strings with at most 32 characters each")]
    InvalidStackFormat,

    #[error("no field to update was provided")]
    NoFieldsProvided,

    #[error("search term `t` was not provided")]
    MissingSearchTerm,

    #[error("`{0}` is not a valid person id")]
    InvalidIdentifier(String),

    #[error("a person with this apelido already exists")]
    DuplicateKey,

    #[error("a field value was rejected by the store")]
    RejectedValue(#[source] sqlx::Error),

    #[error("the store is unavailable")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("the store failed to process the operation")]
    Store(#[source] sqlx::Error),
}

impl PersonError {
    /// Errors caused by the caller's input, safe to echo back verbatim.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PersonError::StoreUnavailable(_) | PersonError::Store(_))
    }
}

impl From<sqlx::Error> for PersonError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
                PersonError::DuplicateKey
            }
            // SQLSTATE class 22: data exception, e.g. `'2023-02-31'::date`.
            sqlx::Error::Database(database_error)
                if database_error
                    .code()
                    .is_some_and(|code| code.starts_with("22")) =>
            {
                PersonError::RejectedValue(error)
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => PersonError::StoreUnavailable(error),
            _ => PersonError::Store(error),
        }
    }
}

/// HTTP face of a failed request. Each handler picks the variant its route
/// contract asks for.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(PersonError),
    MalformedBody(JsonRejection),
    Unprocessable(PersonError),
    NotFound,
    Internal(PersonError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection)
    }
}

fn public_message(error: &PersonError, fallback: &str) -> String {
    if error.is_client_error() {
        error.to_string()
    } else {
        tracing::error!(error = ?error, "store operation failed");
        String::from(fallback)
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => error_response(
                StatusCode::BAD_REQUEST,
                public_message(&error, "the person could not be stored"),
            ),
            ApiError::MalformedBody(JsonRejection::JsonDataError(rejection)) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
            }
            ApiError::MalformedBody(rejection) => {
                error_response(StatusCode::BAD_REQUEST, rejection.body_text())
            }
            ApiError::Unprocessable(error) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                public_message(&error, "the request could not be processed"),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(NotFoundBody {
                    message: String::from("person not found"),
                }),
            )
                .into_response(),
            ApiError::Internal(error) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                public_message(&error, "internal server error"),
            ),
        }
    }
}
