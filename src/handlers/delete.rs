use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};

use crate::dynamo::ItemStore;
use crate::error::HandlerError;
use crate::models::StatusMessage;
use crate::response::build_response;
use crate::state::AppState;

/// DELETE /items/{id} handler - removes a record by identifier
///
/// Requires the `{id}` path parameter. Deleting an identifier that does not
/// exist is reported as not found rather than succeeding silently.
pub async fn delete_handler<S: ItemStore>(
    state: &AppState<S>,
    id: Option<&str>,
) -> Result<Response<Body>, HandlerError> {
    let id = id.ok_or(HandlerError::InvalidParam)?;

    state.store.delete(&state.table_name, id).await?;

    tracing::info!("Deleted item: {}", id);

    build_response(StatusCode::OK, &StatusMessage::success())
}
