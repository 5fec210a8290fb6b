//! Response normalization
//!
//! Every route turns its controller outcome into one of three shapes:
//! the payload itself, `{ "success": message }`, or `{ "error": message }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controllers::{ControllerError, ControllerResult};

/// Errors a route can answer with
#[derive(Error, Debug)]
pub enum ApiError {
    /// No valid session; the controller is never reached
    #[error("UNAUTHORIZED")]
    Unauthorized,

    /// The controller reported a failure; its message is passed through
    #[error("{0}")]
    Domain(String),

    /// The controller answered nothing where the route needs a value
    #[error("{0}")]
    EmptyResult(&'static str),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Domain(_)
            | ApiError::EmptyResult(_)
            | ApiError::MissingField(_)
            | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ControllerError> for ApiError {
    fn from(err: ControllerError) -> Self {
        ApiError::Domain(err.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `{ "error": message }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{ "success": message }`, the answer of operations with no return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: String,
}

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Relay a controller value as-is; an empty value is serialized as `null`
pub fn relay<T>(result: ControllerResult<T>) -> ApiResult<T> {
    result.map(Json).map_err(domain_failure)
}

/// Relay a controller value, answering `fallback` when the controller had none
pub fn relay_or<T>(
    result: ControllerResult<Option<T>>,
    fallback: &'static str,
) -> ApiResult<T> {
    match result {
        Ok(Some(value)) => Ok(Json(value)),
        Ok(None) => {
            tracing::warn!("Controller returned no value: {}", fallback);
            Err(ApiError::EmptyResult(fallback))
        }
        Err(e) => Err(domain_failure(e)),
    }
}

/// Answer `{ "success": message }` once a void operation succeeded
pub fn acknowledge(result: ControllerResult<()>, message: &str) -> ApiResult<Acknowledgement> {
    result
        .map(|()| {
            Json(Acknowledgement {
                success: message.to_string(),
            })
        })
        .map_err(domain_failure)
}

fn domain_failure(err: ControllerError) -> ApiError {
    tracing::warn!("Controller failed: {}", err);
    err.into()
}
