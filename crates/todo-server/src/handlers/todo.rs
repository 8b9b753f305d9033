//! Todo handlers
//!
//! One route serves the whole resource; the HTTP method selects the
//! operation.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::io::ErrorKind;
use todo_types::{Item, ItemInput};
use tracing::debug;

/// Operation selected by the request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update(i64),
    Delete(i64),
}

impl Operation {
    pub fn resolve(method: &Method, uri: &Uri) -> Result<Self, ApiError> {
        match *method {
            Method::GET => Ok(Self::List),
            Method::POST => Ok(Self::Create),
            Method::PUT => Ok(Self::Update(id_param(uri))),
            Method::DELETE => Ok(Self::Delete(id_param(uri))),
            _ => Err(ApiError::MethodNotAllowed),
        }
    }
}

/// First `id` query value as a 64-bit integer. Missing, non-numeric or
/// overflowing values yield `0`, which is passed through to the store as-is.
fn id_param(uri: &Uri) -> i64 {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == "id"))
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let operation = Operation::resolve(&method, &uri)?;
    debug!("Dispatching {:?}", operation);

    match operation {
        Operation::List => list(&state).await,
        Operation::Create => create(&state, &body).await,
        Operation::Update(id) => update(&state, id, &body).await,
        Operation::Delete(id) => delete(&state, id).await,
    }
}

async fn list(state: &AppState) -> Result<Response, ApiError> {
    let items = state.store.list().await.map_err(ApiError::from_list)?;
    Ok(Json(items).into_response())
}

/// Decodes the first JSON value of a body whatever the request's
/// Content-Type says. Anything after that value is ignored and a `null`
/// value gives an empty item. An empty body is an error.
fn decode_body(body: &[u8]) -> Result<Item, serde_json::Error> {
    let input = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<ItemInput>>()
        .next()
        .unwrap_or_else(|| Err(serde_json::Error::io(ErrorKind::UnexpectedEof.into())))?;

    Ok(input.unwrap_or_default().into_item())
}

async fn create(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let item = decode_body(body).map_err(ApiError::DecodeCreate)?;
    let created = state.store.create(&item).await.map_err(ApiError::Insert)?;
    Ok(Json(created).into_response())
}

async fn update(state: &AppState, id: i64, body: &[u8]) -> Result<Response, ApiError> {
    let item = decode_body(body).map_err(ApiError::DecodeUpdate)?;
    state
        .store
        .update(id, &item)
        .await
        .map_err(ApiError::Update)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn delete(state: &AppState, id: i64) -> Result<Response, ApiError> {
    state.store.delete(id).await.map_err(ApiError::Delete)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
