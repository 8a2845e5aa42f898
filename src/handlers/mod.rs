mod create;
mod delete;
mod get;
mod list;
mod update;

use chrono::{SecondsFormat, Utc};
use lambda_http::request::RequestContext;
use lambda_http::{Body, Error, Request, RequestExt, Response};

use crate::dynamo::{ItemStore, Record};
use crate::error::HandlerError;
use crate::response::error_response;
use crate::state::AppState;

/// Lambda entry point: routes one API Gateway event to the matching
/// operation and translates failures into HTTP error responses.
///
/// Every outcome is an `Ok` response; returning `Err` would surface as a
/// function error to the gateway instead of an HTTP status.
pub async fn handle_event<S: ItemStore>(
    state: &AppState<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str().to_string();
    let path = event.uri().path().to_string();
    tracing::debug!("Handling request: {} {}", method, path);

    match route(state, &event).await {
        Ok(response) => Ok(response),
        Err(HandlerError::Internal(source)) => {
            tracing::error!("Request failed: {} {}: {:#}", method, path, source);
            Ok(error_response(&HandlerError::Internal(source)))
        }
        Err(error) => {
            tracing::warn!("Request rejected: {} {}: {}", method, path, error.message());
            Ok(error_response(&error))
        }
    }
}

async fn route<S: ItemStore>(
    state: &AppState<S>,
    event: &Request,
) -> Result<Response<Body>, HandlerError> {
    let id = path_id(event);
    let identity = caller_identity(event);

    match event.method().as_str() {
        "GET" => match id.as_deref() {
            Some(id) => get::get_handler(state, id).await,
            None => list::list_handler(state).await,
        },
        "POST" => create::create_handler(state, event, identity.as_deref()).await,
        "PUT" | "PATCH" => {
            update::update_handler(state, event, id.as_deref(), identity.as_deref()).await
        }
        "DELETE" => delete::delete_handler(state, id.as_deref()).await,
        _ => Err(HandlerError::InvalidMethod),
    }
}

/// Identifier from the `{id}` path parameter; empty counts as absent
fn path_id(event: &Request) -> Option<String> {
    let params = event.path_parameters();
    match params.first("id") {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}

/// Authenticated subject from the gateway authorizer, if any
///
/// REST API events carry Cognito claims as a JSON object under
/// `authorizer.claims`; HTTP API events carry them in the JWT description.
/// Both yield the `sub` claim.
fn caller_identity(event: &Request) -> Option<String> {
    match event.request_context_ref()? {
        RequestContext::ApiGatewayV1(context) => context
            .authorizer
            .fields
            .get("claims")?
            .get("sub")?
            .as_str()
            .map(str::to_string),
        RequestContext::ApiGatewayV2(context) => context
            .authorizer
            .as_ref()?
            .jwt
            .as_ref()?
            .claims
            .get("sub")
            .cloned(),
        _ => None,
    }
}

/// Parse the request body as a JSON object
fn parse_payload(event: &Request) -> Result<Record, HandlerError> {
    let record: Record = serde_json::from_slice(event.body().as_ref())?;
    Ok(record)
}

/// Current time in RFC 3339 with millisecond precision,
/// e.g. `2024-01-15T10:30:00.000Z`
fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
