use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::dynamo::{
    CREATED_AT_ATTRIBUTE, ItemStore, KEY_ATTRIBUTE, OWNER_ATTRIBUTE, UPDATED_AT_ATTRIBUTE,
};
use crate::error::HandlerError;
use crate::response::build_response;
use crate::state::AppState;

/// POST /items handler - creates a record from the request payload
///
/// The server assigns the identifier; any `id` in the payload is replaced.
/// Creation and modification timestamps are set to the same instant, and the
/// caller's subject claim is stamped when the request carries one.
pub async fn create_handler<S: ItemStore>(
    state: &AppState<S>,
    event: &Request,
    identity: Option<&str>,
) -> Result<Response<Body>, HandlerError> {
    let mut record = super::parse_payload(event)?;

    let id = Uuid::new_v4().to_string();
    let now = super::current_timestamp();

    record.insert(KEY_ATTRIBUTE.to_string(), JsonValue::String(id.clone()));
    record.insert(
        CREATED_AT_ATTRIBUTE.to_string(),
        JsonValue::String(now.clone()),
    );
    record.insert(UPDATED_AT_ATTRIBUTE.to_string(), JsonValue::String(now));
    if let Some(identity) = identity {
        record.insert(
            OWNER_ATTRIBUTE.to_string(),
            JsonValue::String(identity.to_string()),
        );
    }

    state.store.put(&state.table_name, &record).await?;

    tracing::info!("Created item: {}", id);

    build_response(StatusCode::CREATED, &record)
}
