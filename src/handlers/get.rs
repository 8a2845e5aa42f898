use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};

use crate::dynamo::ItemStore;
use crate::error::HandlerError;
use crate::response::build_response;
use crate::state::AppState;

/// GET /items/{id} handler - returns one record by identifier
pub async fn get_handler<S: ItemStore>(
    state: &AppState<S>,
    id: &str,
) -> Result<Response<Body>, HandlerError> {
    match state.store.get(&state.table_name, id).await? {
        Some(record) => {
            tracing::info!("Read item: {}", id);
            build_response(StatusCode::OK, &record)
        }
        None => {
            tracing::info!("Item not found: {}", id);
            Err(HandlerError::NotFound)
        }
    }
}
