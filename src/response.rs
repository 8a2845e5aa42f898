use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use serde::Serialize;

use crate::error::HandlerError;
use crate::models::StatusMessage;

/// Build a JSON response with the given status code
///
/// # Errors
/// Returns an error if the payload fails to serialize; callers let that
/// surface through the usual 500 path.
pub fn build_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response<Body>, HandlerError> {
    let body = serde_json::to_string(payload)?;

    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::Text(body))?;

    Ok(response)
}

/// Build the error envelope for a classified failure
///
/// Infallible: the envelope is a plain string message, and if the builder
/// still refuses it the caller gets a bare 500 instead of a rejected
/// invocation.
pub fn error_response(error: &HandlerError) -> Response<Body> {
    let payload = StatusMessage {
        message: error.message().to_string(),
    };

    build_response(error.status_code(), &payload).unwrap_or_else(|_| {
        let mut response = Response::new(Body::Empty);
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}
