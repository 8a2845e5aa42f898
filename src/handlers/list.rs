use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};

use crate::dynamo::ItemStore;
use crate::error::HandlerError;
use crate::response::build_response;
use crate::state::AppState;

/// GET /items handler - returns every record in the table
///
/// The whole collection is returned as a JSON array; an empty table yields
/// an empty array, not an error.
pub async fn list_handler<S: ItemStore>(
    state: &AppState<S>,
) -> Result<Response<Body>, HandlerError> {
    let records = state.store.scan(&state.table_name).await?;

    tracing::info!("Listed {} items", records.len());

    build_response(StatusCode::OK, &records)
}
