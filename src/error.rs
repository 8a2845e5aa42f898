use lambda_http::http::StatusCode;

use crate::dynamo::StoreError;

/// Classified request failure
///
/// Every failure a request can hit maps to one of these kinds, and each kind
/// carries a fixed status code and response message. Internal details ride
/// along for logging but never reach the response body.
#[derive(Debug)]
pub enum HandlerError {
    /// HTTP method outside the supported set
    InvalidMethod,
    /// Missing or empty identifier on a request that requires one
    InvalidParam,
    /// Requested record does not exist
    NotFound,
    /// Store, serialization, or other unexpected failure
    Internal(anyhow::Error),
}

impl HandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::InvalidMethod
            | HandlerError::InvalidParam
            | HandlerError::NotFound => StatusCode::BAD_REQUEST,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The constant message serialized into the error envelope
    pub fn message(&self) -> &'static str {
        match self {
            HandlerError::InvalidMethod => "Invalid HTTP Method",
            HandlerError::InvalidParam => "invalid param",
            HandlerError::NotFound => "Item not found",
            HandlerError::Internal(_) => "server error",
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => HandlerError::NotFound,
            StoreError::Other(source) => HandlerError::Internal(source),
        }
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        HandlerError::Internal(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(err))
    }
}

impl From<lambda_http::http::Error> for HandlerError {
    fn from(err: lambda_http::http::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(err))
    }
}
