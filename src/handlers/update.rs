use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde_json::Value as JsonValue;

use crate::dynamo::{ItemStore, KEY_ATTRIBUTE, OWNER_ATTRIBUTE, UPDATED_AT_ATTRIBUTE};
use crate::error::HandlerError;
use crate::models::StatusMessage;
use crate::response::build_response;
use crate::state::AppState;

/// PUT|PATCH /items/{id} handler - replaces a record from the request payload
///
/// Requires the `{id}` path parameter, which overrides any `id` the payload
/// carries. The modification timestamp is refreshed; `createdAt` is stored as
/// received so the original creation time survives a round-trip through the
/// client.
pub async fn update_handler<S: ItemStore>(
    state: &AppState<S>,
    event: &Request,
    id: Option<&str>,
    identity: Option<&str>,
) -> Result<Response<Body>, HandlerError> {
    let id = id.ok_or(HandlerError::InvalidParam)?;
    let mut record = super::parse_payload(event)?;

    record.insert(KEY_ATTRIBUTE.to_string(), JsonValue::String(id.to_string()));
    record.insert(
        UPDATED_AT_ATTRIBUTE.to_string(),
        JsonValue::String(super::current_timestamp()),
    );
    if let Some(identity) = identity {
        record.insert(
            OWNER_ATTRIBUTE.to_string(),
            JsonValue::String(identity.to_string()),
        );
    }

    state.store.put(&state.table_name, &record).await?;

    tracing::info!("Updated item: {}", id);

    build_response(StatusCode::OK, &StatusMessage::success())
}
